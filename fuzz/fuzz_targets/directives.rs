#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use warden_monitrc::MonitrcParser;

/// 퍼저용 구조적 입력: 키워드 조각을 이어 붙인 제어 파일
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 조각 목록 (최대 64개로 제한)
    pieces: Vec<FuzzPiece>,
}

#[derive(Arbitrary, Debug)]
enum FuzzPiece {
    CheckProcess,
    CheckFile,
    Pidfile,
    Matching,
    Path,
    StartProgram,
    StopProgram,
    Uid,
    Gid,
    Group,
    DependsOn,
    IfFailed,
    UnixSocket,
    Host,
    Port,
    Protocol,
    Timeout,
    Cycles,
    Then,
    TotalMemory,
    Operator(u8),
    IfChanged,
    Comment,
    Newline,
    Quoted(String),
    Word(String),
    Number(u32),
}

impl FuzzPiece {
    fn render(&self, out: &mut String) {
        let text = match self {
            Self::CheckProcess => "check process",
            Self::CheckFile => "check file",
            Self::Pidfile => "with pidfile",
            Self::Matching => "matching",
            Self::Path => "path",
            Self::StartProgram => "start program =",
            Self::StopProgram => "stop program =",
            Self::Uid => "as uid",
            Self::Gid => "and gid",
            Self::Group => "group",
            Self::DependsOn => "depends on",
            Self::IfFailed => "if failed",
            Self::UnixSocket => "unixsocket",
            Self::Host => "host",
            Self::Port => "port",
            Self::Protocol => "protocol",
            Self::Timeout => "with timeout",
            Self::Cycles => "for",
            Self::Then => "then",
            Self::TotalMemory => "if total memory",
            Self::Operator(op) => [">", "<", ">=", "<=", "=", "=="][usize::from(*op) % 6],
            Self::IfChanged => "if changed",
            Self::Comment => "# comment",
            Self::Newline => "\n",
            Self::Quoted(s) => {
                out.push('"');
                out.push_str(s);
                out.push_str("\" ");
                return;
            }
            Self::Word(s) => s.as_str(),
            Self::Number(n) => {
                out.push_str(&n.to_string());
                out.push(' ');
                return;
            }
        };
        out.push_str(text);
        out.push(' ');
    }
}

fuzz_target!(|input: FuzzInput| {
    let mut text = String::new();
    for piece in input.pieces.iter().take(64) {
        piece.render(&mut text);
    }

    let parser = MonitrcParser::new();
    let first = parser.parse("fuzz", &text);
    let second = parser.parse("fuzz", &text);
    // 같은 입력은 같은 결과
    match (first, second) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        _ => panic!("parse result changed between runs"),
    }
});
