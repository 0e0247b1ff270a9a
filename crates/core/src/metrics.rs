//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `warden_`
//! - 모듈명: `monitrc_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(warden_core::metrics::MONITRC_PARSE_ERRORS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// check 종류 레이블 키 (process, file)
pub const LABEL_CHECK_KIND: &str = "kind";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── monitrc 파서 메트릭 ───────────────────────────────────────────

/// 스캐너가 생성한 토큰 수 (counter)
pub const MONITRC_TOKENS_SCANNED_TOTAL: &str = "warden_monitrc_tokens_scanned_total";

/// 파싱된 check 수 (counter, label: kind)
pub const MONITRC_CHECKS_PARSED_TOTAL: &str = "warden_monitrc_checks_parsed_total";

/// 파싱 실패 수 (counter)
pub const MONITRC_PARSE_ERRORS_TOTAL: &str = "warden_monitrc_parse_errors_total";

/// 제어 파일 하나를 파싱하는 데 걸린 시간 (histogram, 초, label: result)
pub const MONITRC_PARSE_DURATION_SECONDS: &str = "warden_monitrc_parse_duration_seconds";

/// 등록된 모든 메트릭 이름
pub const ALL_METRIC_NAMES: &[&str] = &[
    MONITRC_TOKENS_SCANNED_TOTAL,
    MONITRC_CHECKS_PARSED_TOTAL,
    MONITRC_PARSE_ERRORS_TOTAL,
    MONITRC_PARSE_DURATION_SECONDS,
];

/// 모든 메트릭의 설명을 등록합니다.
///
/// recorder 설치 이후 한 번 호출합니다. recorder가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        MONITRC_TOKENS_SCANNED_TOTAL,
        "Total number of tokens produced by the control file scanner"
    );
    describe_counter!(
        MONITRC_CHECKS_PARSED_TOTAL,
        "Total number of check declarations built, per kind (process, file)"
    );
    describe_counter!(
        MONITRC_PARSE_ERRORS_TOTAL,
        "Total number of control files rejected by the parser"
    );
    describe_histogram!(
        MONITRC_PARSE_DURATION_SECONDS,
        "Time spent parsing a single control file in seconds"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metrics_start_with_warden_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("warden_"),
                "Metric '{}' does not start with 'warden_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total_suffix() {
        let counters = [
            MONITRC_TOKENS_SCANNED_TOTAL,
            MONITRC_CHECKS_PARSED_TOTAL,
            MONITRC_PARSE_ERRORS_TOTAL,
        ];
        for name in counters {
            assert!(name.ends_with("_total"), "counter '{}' lacks _total", name);
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        // recorder 없이 호출해도 패닉하지 않아야 함
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_CHECK_KIND, LABEL_RESULT] {
            assert_eq!(label.to_lowercase(), label);
        }
    }
}
