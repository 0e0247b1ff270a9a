//! 도메인 타입 — 제어 파일을 해석한 결과 모델
//!
//! 파서가 만들어 내는 [`ConfigurationModel`]과 그 구성 요소를 정의합니다.
//! 모든 필드는 원문에서 따옴표를 제거한 값이며, 의미 검증(존재하지 않는
//! `depends on` 대상 등)은 수행하지 않습니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 시작/중지 프로그램 선언
///
/// `start program = "/etc/init.d/nginx start" as uid www and gid www`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckProgram {
    /// 실행할 명령 (따옴표 제거)
    pub path: String,
    /// 실행 사용자
    pub uid: Option<String>,
    /// 실행 그룹
    pub gid: Option<String>,
}

impl fmt::Display for CheckProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.path)?;
        if let Some(uid) = &self.uid {
            write!(f, " as uid {uid}")?;
        }
        if let Some(gid) = &self.gid {
            write!(f, " and gid {gid}")?;
        }
        Ok(())
    }
}

/// 유닉스 소켓 연결 실패 규칙 (`if failed unixsocket ...`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSocket {
    /// 소켓 파일 경로
    pub socket_file: String,
    /// 연결 타임아웃 (초)
    pub timeout_seconds: Option<u32>,
    /// 연속 실패 허용 주기 수
    pub num_cycles: Option<u32>,
    /// 실패 시 수행할 동작 (restart, alert 등)
    pub action: String,
}

/// 원격 호스트 연결 실패 규칙 (`if failed host ... port ... protocol ...`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedHost {
    /// 호스트 주소
    pub host: String,
    /// 포트
    pub port: String,
    /// 프로토콜 (http, smtp 등)
    pub protocol: String,
    /// 연결 타임아웃 (초)
    pub timeout_seconds: Option<u32>,
    /// 연속 실패 허용 주기 수
    pub num_cycles: Option<u32>,
    /// 실패 시 수행할 동작
    pub action: String,
}

/// 메모리 사용량 규칙 (`if total memory > 2048 Mb for 3 cycles then alert`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemUsage {
    /// 비교 연산자 (`>`, `<`, `>=`, `=` 등)
    pub operator: String,
    /// 한계값 (단위 제외)
    pub mem_limit: u64,
    /// 단위 (`Mb`, `GB`, `%` 등, 없으면 빈 문자열)
    pub unit: String,
    /// 연속 초과 허용 주기 수
    pub num_cycles: Option<u32>,
    /// 초과 시 수행할 동작
    pub action: String,
}

impl fmt::Display for MemUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total memory {} {}", self.operator, self.mem_limit)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(cycles) = self.num_cycles {
            write!(f, " for {cycles} cycles")?;
        }
        write!(f, " then {}", self.action)
    }
}

/// 프로세스 check (`check process <name> ...`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCheck {
    /// check 이름
    pub name: String,
    /// PID 파일 경로 (`pidfile` 지정 시)
    pub pidfile: String,
    /// 프로세스 매칭 패턴 (`matching` 지정 시)
    pub matching: String,
    /// 시작 프로그램
    pub start_program: Option<CheckProgram>,
    /// 중지 프로그램
    pub stop_program: Option<CheckProgram>,
    /// 소켓 연결 실패 규칙
    pub failed_socket: Option<FailedSocket>,
    /// 호스트 연결 실패 규칙
    pub failed_host: Option<FailedHost>,
    /// 메모리 사용량 규칙 (선언 순서)
    pub total_mem_checks: Vec<MemUsage>,
    /// 소속 그룹
    pub group: String,
    /// 의존 대상 check 이름
    pub depends_on: String,
}

impl fmt::Display for ProcessCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process {}", self.name)?;
        if !self.pidfile.is_empty() {
            write!(f, " (pidfile {})", self.pidfile)?;
        } else if !self.matching.is_empty() {
            write!(f, " (matching {})", self.matching)?;
        }
        Ok(())
    }
}

/// 파일 check (`check file <name> path <path> ...`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCheck {
    /// check 이름
    pub name: String,
    /// 감시 대상 파일 경로
    pub path: String,
    /// 변경 감지 속성 (`checksum`, `timestamp` 등)
    pub if_changed: String,
    /// 변경 감지 시 수행할 동작
    pub if_changed_action: String,
    /// 시작 프로그램
    pub start_program: Option<CheckProgram>,
    /// 중지 프로그램
    pub stop_program: Option<CheckProgram>,
    /// 소켓 연결 실패 규칙
    pub failed_socket: Option<FailedSocket>,
    /// 호스트 연결 실패 규칙
    pub failed_host: Option<FailedHost>,
    /// 메모리 사용량 규칙
    pub total_mem_checks: Vec<MemUsage>,
    /// 소속 그룹
    pub group: String,
    /// 의존 대상 check 이름
    pub depends_on: String,
}

impl fmt::Display for FileCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {} (path {})", self.name, self.path)
    }
}

/// 제어 파일 전체 모델
///
/// check는 선언 순서대로 종류별 목록에 저장됩니다.
/// 이름 중복은 허용되며, 조회 메서드는 처음 선언된 check를 돌려줍니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationModel {
    /// 프로세스 check 목록
    pub process_checks: Vec<ProcessCheck>,
    /// 파일 check 목록
    pub file_checks: Vec<FileCheck>,
}

impl ConfigurationModel {
    /// 전체 check 수
    pub fn len(&self) -> usize {
        self.process_checks.len() + self.file_checks.len()
    }

    /// check가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 이름으로 프로세스 check를 찾습니다.
    pub fn process(&self, name: &str) -> Option<&ProcessCheck> {
        self.process_checks.iter().find(|c| c.name == name)
    }

    /// 이름으로 파일 check를 찾습니다.
    pub fn file(&self, name: &str) -> Option<&FileCheck> {
        self.file_checks.iter().find(|c| c.name == name)
    }
}
