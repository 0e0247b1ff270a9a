//! 토큰 타입 — 스캐너 출력 단위
//!
//! 토큰은 `(종류, 원문 텍스트)` 쌍입니다. 키워드 표식(marker) 토큰의 텍스트는
//! 키워드 자체(`"depends on"`, `"with timeout"` 등)이고, 값 토큰의 텍스트는
//! 원문 그대로입니다. 따옴표 문자열은 따옴표를 포함합니다.

use std::fmt;

use serde::Serialize;

/// 토큰 종류
///
/// 문법에 등장하는 모든 토큰 종류의 닫힌 집합입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// 어휘 에러 (스트림의 마지막 토큰)
    Error,
    /// 정상 종료 (스트림의 마지막 토큰)
    Eof,

    // --- check 선언 ---
    /// `check`
    CheckStart,
    /// `process`
    CheckProcess,
    /// `file`
    CheckFile,
    /// 프로세스 check 이름
    ProcessName,
    /// PID 지정 줄 (`with pidfile /x`, `matching foo.*`) 원문
    ProcessPid,
    /// 파일 check 이름
    FileName,
    /// 파일 check 경로
    FilePath,

    // --- 메서드 블록 ---
    /// `start program`
    StartProgram,
    /// `stop program`
    StopProgram,
    /// 프로그램 경로 표식 (텍스트 없음, 뒤따르는 값이 경로)
    ProgramPath,
    /// `as uid`
    Uid,
    /// `and gid`
    Gid,
    /// `group`
    Group,
    /// `depends on`
    DependsOn,

    // --- 값 ---
    /// 따옴표 문자열 (따옴표 포함)
    QuotedString,
    /// 공백으로 구분된 문자열
    UnquotedString,

    // --- 연결 테스트 ---
    /// `if failed`
    ConnectionTestEnter,
    /// `unixsocket`
    UnixSocket,
    /// `host`
    Host,
    /// `port`
    Port,
    /// `protocol`
    Protocol,
    /// `with timeout`
    Timeout,
    /// `for`
    Cycles,
    /// 조건 절 종료 표식 (텍스트 없음)
    ConnectionTestExit,
    /// `then`
    Action,

    // --- 리소스/변경 테스트 ---
    /// `if total memory`
    ResourceTest,
    /// 비교 연산자 (`>`, `<`, `>=` 등)
    ResourceOperator,
    /// `if changed`
    IfChanged,
}

impl TokenKind {
    /// 값 토큰(따옴표/비따옴표 문자열)인지 여부
    pub fn is_value(self) -> bool {
        matches!(self, Self::QuotedString | Self::UnquotedString)
    }

    /// 스트림을 끝내는 토큰인지 여부
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Eof | Self::Error)
    }

    /// 사람이 읽을 수 있는 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Eof => "eof",
            Self::CheckStart => "check",
            Self::CheckProcess => "check-process",
            Self::CheckFile => "check-file",
            Self::ProcessName => "process-name",
            Self::ProcessPid => "process-pid",
            Self::FileName => "file-name",
            Self::FilePath => "file-path",
            Self::StartProgram => "start-program",
            Self::StopProgram => "stop-program",
            Self::ProgramPath => "program-path",
            Self::Uid => "uid",
            Self::Gid => "gid",
            Self::Group => "group",
            Self::DependsOn => "depends-on",
            Self::QuotedString => "quoted-string",
            Self::UnquotedString => "unquoted-string",
            Self::ConnectionTestEnter => "if-failed",
            Self::UnixSocket => "unixsocket",
            Self::Host => "host",
            Self::Port => "port",
            Self::Protocol => "protocol",
            Self::Timeout => "timeout",
            Self::Cycles => "cycles",
            Self::ConnectionTestExit => "condition-end",
            Self::Action => "action",
            Self::ResourceTest => "if-total-memory",
            Self::ResourceOperator => "operator",
            Self::IfChanged => "if-changed",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 스캐너가 생성하는 토큰
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// 토큰 종류
    pub kind: TokenKind,
    /// 원문 텍스트
    pub text: String,
}

impl Token {
    /// 새 토큰을 생성합니다.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Error => f.write_str(&self.text),
            kind if self.text.is_empty() => write!(f, "{kind}"),
            kind => write!(f, "{kind} {:?}", self.text),
        }
    }
}
