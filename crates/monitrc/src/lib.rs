#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`token`]: 토큰 종류와 토큰 타입
//! - [`scanner`]: 원문 텍스트를 토큰으로 변환하는 상태 기계
//! - [`builder`]: 토큰 시퀀스에서 [`ConfigurationModel`](warden_core::ConfigurationModel) 구성
//! - [`parser`]: 크기 제한, 메트릭, 로깅을 포함한 진입점 ([`ControlFileParser`](warden_core::ControlFileParser) 구현)
//! - [`config`]: 파서 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! text -> Scanner (Iterator<Item = Token>) -> TreeBuilder -> ConfigurationModel
//!            |                                    |
//!       Error/Eof 종료 토큰               check 이름 + 절 이름을 담은 에러
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod token;

// --- 주요 타입 re-export ---

// 파서
pub use parser::MonitrcParser;

// 스캐너 / 빌더
pub use builder::{TreeBuilder, build};
pub use scanner::{ScanOptions, Scanner, scan, scan_with_options};
pub use token::{Token, TokenKind};

// 설정
pub use config::{ParserConfig, ParserConfigBuilder};

// 에러
pub use error::MonitrcError;
