//! 제어 파일 파서 — 스캐너와 트리 빌더를 묶는 진입점
//!
//! [`MonitrcParser`]는 입력 크기 제한을 확인한 뒤 스캐너 출력을 트리 빌더에
//! 직접 흘려보냅니다. 토큰 시퀀스는 중간에 모이지 않습니다.
//! core의 [`ControlFileParser`] trait을 구현하므로 다른 형식의 파서와 같은
//! 방식으로 사용할 수 있습니다.

use std::time::Instant;

use tracing::{debug, warn};
use warden_core::error::WardenError;
use warden_core::metrics as m;
use warden_core::pipeline::ControlFileParser;
use warden_core::types::ConfigurationModel;

use crate::builder::TreeBuilder;
use crate::config::ParserConfig;
use crate::error::MonitrcError;
use crate::scanner::scan_with_options;
use crate::token::{Token, TokenKind};

/// monit 스타일 제어 파일 파서
#[derive(Debug, Clone, Default)]
pub struct MonitrcParser {
    config: ParserConfig,
}

impl MonitrcParser {
    /// 기본 설정으로 파서를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 검증된 설정으로 파서를 생성합니다.
    pub fn with_config(config: ParserConfig) -> Result<Self, MonitrcError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// 제어 파일 텍스트를 파싱합니다.
    ///
    /// `source`는 에러 메시지에 표시되는 입력 이름입니다 (보통 파일 경로).
    pub fn parse(&self, source: &str, text: &str) -> Result<ConfigurationModel, MonitrcError> {
        let started = Instant::now();
        let result = self.build_model(source, text);
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::histogram!(m::MONITRC_PARSE_DURATION_SECONDS, m::LABEL_RESULT => outcome)
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(model) => {
                metrics::counter!(m::MONITRC_CHECKS_PARSED_TOTAL, m::LABEL_CHECK_KIND => "process")
                    .increment(model.process_checks.len() as u64);
                metrics::counter!(m::MONITRC_CHECKS_PARSED_TOTAL, m::LABEL_CHECK_KIND => "file")
                    .increment(model.file_checks.len() as u64);
                debug!(
                    source,
                    processes = model.process_checks.len(),
                    files = model.file_checks.len(),
                    "control file parsed"
                );
            }
            Err(e) => {
                metrics::counter!(m::MONITRC_PARSE_ERRORS_TOTAL).increment(1);
                warn!(source, error = %e, "control file rejected");
            }
        }
        result
    }

    /// 입력을 토큰 목록으로 변환합니다. 마지막 원소는 항상 `Eof`입니다.
    ///
    /// 스캐너가 어휘 에러를 보고하면 [`MonitrcError::Lexical`]을 반환합니다.
    pub fn tokens(&self, source: &str, text: &str) -> Result<Vec<Token>, MonitrcError> {
        self.check_size(text)?;
        let tokens: Vec<Token> = scan_with_options(source, text, self.config.scan_options()).collect();
        metrics::counter!(m::MONITRC_TOKENS_SCANNED_TOTAL).increment(tokens.len() as u64);

        match tokens.last() {
            Some(last) if last.kind == TokenKind::Error => Err(MonitrcError::Lexical {
                message: last.text.clone(),
            }),
            _ => Ok(tokens),
        }
    }

    fn build_model(&self, source: &str, text: &str) -> Result<ConfigurationModel, MonitrcError> {
        self.check_size(text)?;

        let mut scanned: u64 = 0;
        let tokens = scan_with_options(source, text, self.config.scan_options())
            .inspect(|_| scanned += 1);
        let result = TreeBuilder::new(tokens)
            .with_max_checks(self.config.max_checks)
            .build();
        metrics::counter!(m::MONITRC_TOKENS_SCANNED_TOTAL).increment(scanned);
        result
    }

    fn check_size(&self, text: &str) -> Result<(), MonitrcError> {
        if text.len() > self.config.max_input_size {
            return Err(MonitrcError::TooLarge {
                size: text.len(),
                max: self.config.max_input_size,
            });
        }
        Ok(())
    }
}

impl ControlFileParser for MonitrcParser {
    fn format_name(&self) -> &str {
        "monitrc"
    }

    fn parse(&self, source: &str, text: &str) -> Result<ConfigurationModel, WardenError> {
        Ok(MonitrcParser::parse(self, source, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfigBuilder;

    #[test]
    fn parses_single_process() {
        let model = MonitrcParser::new()
            .parse("test", "check process abc with pidfile /tmp")
            .unwrap();
        assert_eq!(model.process_checks.len(), 1);
        assert_eq!(model.process_checks[0].name, "abc");
        assert_eq!(model.process_checks[0].pidfile, "/tmp");
    }

    #[test]
    fn empty_input_is_empty_model() {
        let model = MonitrcParser::new().parse("test", "").unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let config = ParserConfigBuilder::new().max_input_size(8).build().unwrap();
        let parser = MonitrcParser::with_config(config).unwrap();
        let err = parser.parse("test", "check process abc").unwrap_err();
        assert!(matches!(err, MonitrcError::TooLarge { size: 17, max: 8 }));
        assert!(parser.tokens("test", "check process abc").is_err());
    }

    #[test]
    fn with_config_rejects_invalid_config() {
        let config = ParserConfig {
            max_checks: 0,
            ..Default::default()
        };
        assert!(MonitrcParser::with_config(config).is_err());
    }

    #[test]
    fn max_checks_applies_to_parse() {
        let config = ParserConfigBuilder::new().max_checks(1).build().unwrap();
        let parser = MonitrcParser::with_config(config).unwrap();
        let err = parser
            .parse("test", "check process a\ncheck process b\n")
            .unwrap_err();
        assert!(matches!(err, MonitrcError::TooManyChecks { max: 1 }));
    }

    #[test]
    fn tokens_end_with_eof() {
        let tokens = MonitrcParser::new()
            .tokens("test", "check file conf path /etc/x")
            .unwrap();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn tokens_reports_lexical_error() {
        let err = MonitrcParser::new()
            .tokens("test", "check file conf")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "lexical error: test:1: check file <path> missing"
        );
    }

    #[test]
    fn trait_object_converts_errors() {
        let parser: Box<dyn ControlFileParser> = Box::new(MonitrcParser::new());
        assert_eq!(parser.format_name(), "monitrc");
        let err = parser.parse("test", "check file conf").unwrap_err();
        assert!(matches!(
            err,
            WardenError::Parse(warden_core::error::ParseError::Syntax(_))
        ));
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_arbitrary_text_does_not_panic(text in "\\PC{0,400}") {
                let _ = MonitrcParser::new().parse("prop", &text);
            }

            #[test]
            fn parse_keyword_soup_does_not_panic(
                words in prop::collection::vec(
                    prop::sample::select(vec![
                        "check", "process", "file", "with", "pidfile", "path", "start",
                        "stop", "program", "=", "as", "uid", "and", "gid", "if", "failed",
                        "host", "port", "protocol", "unixsocket", "timeout", "for", "cycles",
                        "then", "total", "memory", ">", "changed", "group", "depends", "on",
                        "\"", "#", "\n", "/x", "10",
                    ]),
                    0..60,
                )
            ) {
                let text = words.join(" ");
                let _ = MonitrcParser::new().parse("prop", &text);
            }

            #[test]
            fn pidfile_path_round_trips(path in "/[a-z]{1,12}(/[a-z0-9_.]{1,12}){0,3}") {
                let text = format!("check process svc with pidfile {path}\n");
                let model = MonitrcParser::new().parse("prop", &text).unwrap();
                prop_assert_eq!(&model.process_checks[0].pidfile, &path);
            }

            #[test]
            fn tokens_always_end_with_one_terminal(text in "\\PC{0,200}") {
                let tokens: Vec<Token> = crate::scanner::scan("prop", &text).collect();
                let terminals = tokens.iter().filter(|t| t.kind.is_terminal()).count();
                prop_assert_eq!(terminals, 1);
                prop_assert!(tokens.last().is_some_and(|t| t.kind.is_terminal()));
            }
        }
    }
}
