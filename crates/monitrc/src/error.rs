//! 제어 파일 파서 에러 타입
//!
//! [`MonitrcError`]는 스캔, 트리 구성, 설정 검증 중 발생하는 모든 에러를 표현합니다.
//! `From<MonitrcError> for WardenError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.
//!
//! 트리 빌더 에러는 가능한 경우 문제가 된 check 이름과 해석 중이던 절(clause)을
//! 함께 담습니다.

use warden_core::error::{ConfigError, ParseError, WardenError};

/// 제어 파일 파서 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum MonitrcError {
    /// 스캐너가 보고한 어휘 에러 (`<source>:<line>: <message>`)
    #[error("lexical error: {message}")]
    Lexical {
        /// 에러 토큰 텍스트
        message: String,
    },

    /// 절을 해석하는 도중 토큰이 끝남
    #[error("unexpected end of input while decoding {clause}{}", in_check(.check))]
    UnexpectedEnd {
        /// 현재 check 이름
        check: Option<String>,
        /// 해석 중이던 절
        clause: &'static str,
    },

    /// 숫자로 변환할 수 없는 값
    #[error("invalid numeric value for {field}: {text}{}", in_check(.check))]
    InvalidNumber {
        /// 현재 check 이름
        check: Option<String>,
        /// 필드 이름 (timeout, cycles 등)
        field: &'static str,
        /// 원문 텍스트
        text: String,
    },

    /// 기대하지 않은 종류의 토큰
    #[error("unexpected {found} while decoding {clause}{}: expected {expected}", in_check(.check))]
    UnexpectedToken {
        /// 현재 check 이름
        check: Option<String>,
        /// 해석 중이던 절
        clause: &'static str,
        /// 기대한 토큰 설명
        expected: &'static str,
        /// 실제 토큰
        found: String,
    },

    /// 토큰 순서는 맞지만 내용이 유효하지 않은 절
    #[error("invalid {clause} clause{}: {reason}", in_check(.check))]
    InvalidClause {
        /// 현재 check 이름
        check: Option<String>,
        /// 절 이름
        clause: &'static str,
        /// 사유
        reason: String,
    },

    /// check 수 제한 초과
    #[error("too many checks: limit is {max}")]
    TooManyChecks {
        /// 허용 최대 check 수
        max: usize,
    },

    /// 입력 크기 제한 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge {
        /// 입력 크기 (바이트)
        size: usize,
        /// 허용 최대 크기
        max: usize,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn in_check(check: &Option<String>) -> String {
    match check {
        Some(name) => format!(" in check '{name}'"),
        None => String::new(),
    }
}

impl From<MonitrcError> for WardenError {
    fn from(err: MonitrcError) -> Self {
        match err {
            MonitrcError::TooLarge { size, max } => ParseError::TooLarge { size, max }.into(),
            MonitrcError::Config { field, reason } => {
                ConfigError::InvalidValue { field, reason }.into()
            }
            MonitrcError::Io(e) => WardenError::Io(e),
            other => ParseError::Syntax(other.to_string()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_end_display_names_check_and_clause() {
        let err = MonitrcError::UnexpectedEnd {
            check: Some("nginx".to_owned()),
            clause: "start program",
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input while decoding start program in check 'nginx'"
        );
    }

    #[test]
    fn invalid_number_display_without_check() {
        let err = MonitrcError::InvalidNumber {
            check: None,
            field: "timeout",
            text: "abc".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid numeric value for timeout: abc");
    }

    #[test]
    fn unexpected_token_display() {
        let err = MonitrcError::UnexpectedToken {
            check: Some("db".to_owned()),
            clause: "if failed",
            expected: "then",
            found: "host \"host\"".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("if failed"));
        assert!(msg.contains("'db'"));
        assert!(msg.contains("expected then"));
    }

    #[test]
    fn syntax_errors_convert_to_parse_error() {
        let err = MonitrcError::Lexical {
            message: "inline:1: check file <path> missing".to_owned(),
        };
        let warden: WardenError = err.into();
        assert!(matches!(warden, WardenError::Parse(ParseError::Syntax(_))));
        assert!(warden.to_string().contains("check file <path> missing"));
    }

    #[test]
    fn too_large_converts_to_parse_too_large() {
        let err = MonitrcError::TooLarge { size: 10, max: 5 };
        let warden: WardenError = err.into();
        assert!(matches!(
            warden,
            WardenError::Parse(ParseError::TooLarge { size: 10, max: 5 })
        ));
    }

    #[test]
    fn config_error_converts_to_config_error() {
        let err = MonitrcError::Config {
            field: "max_checks".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let warden: WardenError = err.into();
        assert!(matches!(warden, WardenError::Config(_)));
    }
}
