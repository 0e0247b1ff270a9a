//! 파서 설정
//!
//! [`ParserConfig`]는 core의 [`ParserSection`](warden_core::config::ParserSection)을
//! 기반으로 제어 파일 파서가 사용하는 제한값과 옵션을 제공합니다.
//!
//! # 사용 예시
//! ```
//! use warden_core::config::WardenConfig;
//! use warden_monitrc::config::ParserConfig;
//!
//! let core_config = WardenConfig::default();
//! let config = ParserConfig::from_core(&core_config.parser);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use warden_core::config::{DEFAULT_MAX_CHECKS, DEFAULT_MAX_INPUT_SIZE, ParserSection};

use crate::error::MonitrcError;
use crate::scanner::ScanOptions;

/// 입력 크기 상한 (64 MiB)
const MAX_INPUT_SIZE_LIMIT: usize = 64 * 1024 * 1024;
/// check 수 상한
const MAX_CHECKS_LIMIT: usize = 1_000_000;

/// 제어 파일 파서 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// 입력 최대 크기 (바이트)
    pub max_input_size: usize,
    /// 최대 check 선언 수
    pub max_checks: usize,
    /// `#` 주석 허용 여부
    pub allow_comments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_checks: DEFAULT_MAX_CHECKS,
            allow_comments: true,
        }
    }
}

impl ParserConfig {
    /// core의 `ParserSection`에서 파서 설정을 생성합니다.
    pub fn from_core(core: &ParserSection) -> Self {
        Self {
            max_input_size: core.max_input_size,
            max_checks: core.max_checks,
            allow_comments: core.allow_comments,
        }
    }

    /// 스캐너 옵션을 반환합니다.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            allow_comments: self.allow_comments,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), MonitrcError> {
        if self.max_input_size == 0 || self.max_input_size > MAX_INPUT_SIZE_LIMIT {
            return Err(MonitrcError::Config {
                field: "max_input_size".to_owned(),
                reason: format!("must be 1-{MAX_INPUT_SIZE_LIMIT}"),
            });
        }

        if self.max_checks == 0 || self.max_checks > MAX_CHECKS_LIMIT {
            return Err(MonitrcError::Config {
                field: "max_checks".to_owned(),
                reason: format!("must be 1-{MAX_CHECKS_LIMIT}"),
            });
        }

        Ok(())
    }
}

/// 파서 설정 빌더
#[derive(Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 입력 최대 크기를 설정합니다.
    pub fn max_input_size(mut self, size: usize) -> Self {
        self.config.max_input_size = size;
        self
    }

    /// 최대 check 수를 설정합니다.
    pub fn max_checks(mut self, max: usize) -> Self {
        self.config.max_checks = max;
        self
    }

    /// 주석 허용 여부를 설정합니다.
    pub fn allow_comments(mut self, allow: bool) -> Self {
        self.config.allow_comments = allow;
        self
    }

    /// 설정을 검증하고 `ParserConfig`를 생성합니다.
    pub fn build(self) -> Result<ParserConfig, MonitrcError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
