//! 파이프라인 trait — 파서 확장 포인트 정의

use crate::error::WardenError;
use crate::types::ConfigurationModel;

/// 제어 파일 파서 trait
///
/// 새로운 제어 파일 방언을 지원하려면 이 trait을 구현합니다.
pub trait ControlFileParser: Send + Sync {
    /// 지원하는 형식 이름
    fn format_name(&self) -> &str;

    /// 제어 파일 텍스트를 모델로 파싱
    ///
    /// `source`는 진단 메시지에 사용되는 이름(보통 파일 경로)입니다.
    fn parse(&self, source: &str, text: &str) -> Result<ConfigurationModel, WardenError>;
}
