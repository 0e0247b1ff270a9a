//! 제어 파일 파서 벤치마크
//!
//! 스캐너 단독 처리량과 스캔 + 트리 구성 전체 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use warden_monitrc::{MonitrcParser, scan};

/// 모든 절을 포함한 단일 check
const FULL_CHECK: &str = include_str!("../testdata/full.monitrc");

/// 최소 check
const MINIMAL_CHECK: &str = "check process abc with pidfile /var/run/abc.pid\n";

/// 프로세스 check `count`개로 이루어진 제어 파일
fn generate_checks(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                "check process svc{i} with pidfile /var/run/svc{i}.pid\n  \
                 start program = \"/etc/init.d/svc{i} start\" as uid svc and gid svc\n  \
                 if failed port {port} protocol http with timeout 5 seconds then restart\n  \
                 if total memory > 256 Mb for 3 cycles then alert\n  \
                 group services\n\n",
                port = 8000 + i
            )
        })
        .collect()
}

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    group.throughput(Throughput::Bytes(MINIMAL_CHECK.len() as u64));
    group.bench_function("minimal", |b| {
        b.iter(|| scan("bench", black_box(MINIMAL_CHECK)).count())
    });

    group.throughput(Throughput::Bytes(FULL_CHECK.len() as u64));
    group.bench_function("full", |b| {
        b.iter(|| scan("bench", black_box(FULL_CHECK)).count())
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let parser = MonitrcParser::new();

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));
    group.bench_function("full", |b| {
        b.iter(|| parser.parse("bench", black_box(FULL_CHECK)).unwrap())
    });
    group.finish();

    // check 수에 따른 스케일링
    let mut group = c.benchmark_group("parse_scaling");
    for count in [10, 100, 1000] {
        let text = generate_checks(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| parser.parse("bench", black_box(text)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scanner, bench_parse);
criterion_main!(benches);
