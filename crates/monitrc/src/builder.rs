//! 트리 빌더 — 토큰 시퀀스를 [`ConfigurationModel`]로 변환
//!
//! 토큰은 `Iterator`로 한 개씩 당겨 옵니다. check 표식(`process`/`file`)을 읽으면
//! 빈 check를 모델에 추가하고 그 위치를 현재 check로 기억합니다. 이후의 모든 절은
//! 다음 check가 생길 때까지 현재 check에만 기록됩니다.
//!
//! 각 절은 이름 있는 하위 파서(`program`, `connection_test`, `resource_test` 등)가
//! 토큰 종류를 확인하며 해석합니다. 선택 요소(uid/gid, timeout, cycles)는 없어도
//! 되고, 필수 요소가 빠지거나 토큰이 도중에 끝나면 에러입니다.
//!
//! # 사용 예시
//! ```
//! use warden_monitrc::{build, scan};
//!
//! let model = build(scan("inline", "check file conf path /etc/app.conf")).unwrap();
//! assert_eq!(model.file_checks[0].path, "/etc/app.conf");
//! ```

use std::iter::Peekable;

use tracing::debug;
use warden_core::config::DEFAULT_MAX_CHECKS;
use warden_core::types::{
    CheckProgram, ConfigurationModel, FailedHost, FailedSocket, FileCheck, MemUsage, ProcessCheck,
};

use crate::error::MonitrcError;
use crate::token::{Token, TokenKind};

/// 토큰 시퀀스를 모델로 변환합니다.
pub fn build<I>(tokens: I) -> Result<ConfigurationModel, MonitrcError>
where
    I: IntoIterator<Item = Token>,
{
    TreeBuilder::new(tokens).build()
}

/// 현재 check 위치 (모델 내 종류별 목록의 인덱스)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentCheck {
    Process(usize),
    File(usize),
}

/// 해석이 끝난 절. 현재 check에 기록됩니다.
#[derive(Debug)]
enum Clause {
    Name(String),
    Pidfile(String),
    Matching(String),
    Path(String),
    StartProgram(CheckProgram),
    StopProgram(CheckProgram),
    Group(String),
    DependsOn(String),
    FailedSocket(FailedSocket),
    FailedHost(FailedHost),
    MemUsage(MemUsage),
    IfChanged { attribute: String, action: String },
}

impl Clause {
    fn name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Pidfile(_) | Self::Matching(_) => "pid",
            Self::Path(_) => "path",
            Self::StartProgram(_) => "start program",
            Self::StopProgram(_) => "stop program",
            Self::Group(_) => "group",
            Self::DependsOn(_) => "depends on",
            Self::FailedSocket(_) | Self::FailedHost(_) => "if failed",
            Self::MemUsage(_) => "if total memory",
            Self::IfChanged { .. } => "if changed",
        }
    }
}

/// 연결/리소스 테스트의 공통 조건 절
#[derive(Debug, Default)]
struct Conditions {
    timeout_seconds: Option<u32>,
    num_cycles: Option<u32>,
    action: String,
}

/// 토큰 시퀀스에서 모델을 구성하는 빌더
pub struct TreeBuilder<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    model: ConfigurationModel,
    current: Option<CurrentCheck>,
    max_checks: usize,
}

impl<I: Iterator<Item = Token>> TreeBuilder<I> {
    /// 새 빌더를 생성합니다.
    pub fn new(tokens: impl IntoIterator<Item = Token, IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            model: ConfigurationModel::default(),
            current: None,
            max_checks: DEFAULT_MAX_CHECKS,
        }
    }

    /// 허용할 최대 check 수를 설정합니다.
    pub fn with_max_checks(mut self, max_checks: usize) -> Self {
        self.max_checks = max_checks;
        self
    }

    /// 토큰을 모두 소비하여 모델을 완성합니다.
    pub fn build(mut self) -> Result<ConfigurationModel, MonitrcError> {
        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Error => return Err(MonitrcError::Lexical { message: token.text }),
                TokenKind::CheckStart => match self.peek_kind() {
                    Some(TokenKind::CheckProcess | TokenKind::CheckFile) => {}
                    _ => {
                        let found = self.next_token("check")?;
                        return Err(self.unexpected("check", "'process' or 'file'", &found));
                    }
                },
                TokenKind::CheckProcess => self.open_process()?,
                TokenKind::CheckFile => self.open_file()?,
                TokenKind::ProcessName | TokenKind::FileName => {
                    self.apply(Clause::Name(token.text.clone()), &token)?;
                }
                TokenKind::ProcessPid => {
                    let clause = self.pid_spec(&token.text)?;
                    self.apply(clause, &token)?;
                }
                TokenKind::FilePath => self.apply(Clause::Path(token.text.clone()), &token)?,
                TokenKind::StartProgram => {
                    let program = self.program("start program")?;
                    self.apply(Clause::StartProgram(program), &token)?;
                }
                TokenKind::StopProgram => {
                    let program = self.program("stop program")?;
                    self.apply(Clause::StopProgram(program), &token)?;
                }
                TokenKind::Group => {
                    let group = self.value("group")?;
                    self.apply(Clause::Group(group), &token)?;
                }
                TokenKind::DependsOn => {
                    let target = self.value("depends on")?;
                    self.apply(Clause::DependsOn(target), &token)?;
                }
                TokenKind::ConnectionTestEnter => {
                    let clause = self.connection_test()?;
                    self.apply(clause, &token)?;
                }
                TokenKind::ResourceTest => {
                    let usage = self.resource_test()?;
                    self.apply(Clause::MemUsage(usage), &token)?;
                }
                TokenKind::IfChanged => {
                    let clause = self.change_test()?;
                    self.apply(clause, &token)?;
                }
                _ => return Err(self.unexpected("check", "a check directive", &token)),
            }
        }

        debug!(
            processes = self.model.process_checks.len(),
            files = self.model.file_checks.len(),
            "configuration model built"
        );
        Ok(self.model)
    }

    // --- check 생성/기록 ---

    fn ensure_capacity(&self) -> Result<(), MonitrcError> {
        if self.model.len() >= self.max_checks {
            return Err(MonitrcError::TooManyChecks {
                max: self.max_checks,
            });
        }
        Ok(())
    }

    fn open_process(&mut self) -> Result<(), MonitrcError> {
        self.ensure_capacity()?;
        self.model.process_checks.push(ProcessCheck::default());
        let index = self.model.process_checks.len() - 1;
        self.current = Some(CurrentCheck::Process(index));
        debug!(index, "opened process check");
        Ok(())
    }

    fn open_file(&mut self) -> Result<(), MonitrcError> {
        self.ensure_capacity()?;
        self.model.file_checks.push(FileCheck::default());
        let index = self.model.file_checks.len() - 1;
        self.current = Some(CurrentCheck::File(index));
        debug!(index, "opened file check");
        Ok(())
    }

    /// 해석된 절을 현재 check에 기록합니다.
    fn apply(&mut self, clause: Clause, token: &Token) -> Result<(), MonitrcError> {
        let clause_name = clause.name();
        let rejected = match self.current {
            Some(CurrentCheck::Process(i)) => match self.model.process_checks.get_mut(i) {
                Some(check) => apply_to_process(check, clause),
                None => Some(clause),
            },
            Some(CurrentCheck::File(i)) => match self.model.file_checks.get_mut(i) {
                Some(check) => apply_to_file(check, clause),
                None => Some(clause),
            },
            None => return Err(self.unexpected("check", "a check declaration", token)),
        };

        match (rejected, self.current) {
            (None, _) => Ok(()),
            (Some(_), Some(CurrentCheck::Process(_))) => Err(MonitrcError::InvalidClause {
                check: self.check_name(),
                clause: clause_name,
                reason: "not valid for a process check".to_owned(),
            }),
            (Some(_), _) => Err(MonitrcError::InvalidClause {
                check: self.check_name(),
                clause: clause_name,
                reason: "not valid for a file check".to_owned(),
            }),
        }
    }

    fn check_name(&self) -> Option<String> {
        let name = match self.current? {
            CurrentCheck::Process(i) => &self.model.process_checks.get(i)?.name,
            CurrentCheck::File(i) => &self.model.file_checks.get(i)?.name,
        };
        (!name.is_empty()).then(|| name.clone())
    }

    // --- 토큰 헬퍼 ---

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek().map(|t| t.kind)
    }

    /// 절 해석 중 다음 토큰을 가져옵니다. 끝이면 `UnexpectedEnd`입니다.
    fn next_token(&mut self, clause: &'static str) -> Result<Token, MonitrcError> {
        match self.tokens.next() {
            None => Err(self.unexpected_end(clause)),
            Some(token) => match token.kind {
                TokenKind::Eof => Err(self.unexpected_end(clause)),
                TokenKind::Error => Err(MonitrcError::Lexical {
                    message: token.text,
                }),
                _ => Ok(token),
            },
        }
    }

    fn expect_kind(&mut self, clause: &'static str, kind: TokenKind) -> Result<Token, MonitrcError> {
        let token = self.next_token(clause)?;
        if token.kind != kind {
            return Err(self.unexpected(clause, kind.as_str(), &token));
        }
        Ok(token)
    }

    /// 필수 값 하나를 읽고 따옴표를 제거합니다.
    fn value(&mut self, clause: &'static str) -> Result<String, MonitrcError> {
        let token = self.next_token(clause)?;
        if !token.kind.is_value() {
            return Err(self.unexpected(clause, "a value", &token));
        }
        Ok(strip_quotes(&token.text))
    }

    /// 다음 토큰이 값이면 소비합니다.
    fn optional_value(&mut self) -> Option<String> {
        if self.peek_kind().is_some_and(TokenKind::is_value) {
            self.tokens.next().map(|t| strip_quotes(&t.text))
        } else {
            None
        }
    }

    fn unexpected(&self, clause: &'static str, expected: &'static str, found: &Token) -> MonitrcError {
        MonitrcError::UnexpectedToken {
            check: self.check_name(),
            clause,
            expected,
            found: found.to_string(),
        }
    }

    fn unexpected_end(&self, clause: &'static str) -> MonitrcError {
        MonitrcError::UnexpectedEnd {
            check: self.check_name(),
            clause,
        }
    }

    /// 조건 파서가 받아들였지만 이 절에는 저장할 곳이 없는 조건
    fn not_allowed(&self, clause: &'static str, condition: &str) -> MonitrcError {
        MonitrcError::InvalidClause {
            check: self.check_name(),
            clause,
            reason: format!("{condition} not allowed"),
        }
    }

    fn number(&self, field: &'static str, text: &str) -> Result<u32, MonitrcError> {
        text.parse::<u32>().map_err(|_| MonitrcError::InvalidNumber {
            check: self.check_name(),
            field,
            text: text.to_owned(),
        })
    }

    // --- 하위 파서 ---

    /// `with pidfile <path>` / `pidfile <path>` / `matching <pattern>`
    fn pid_spec(&self, text: &str) -> Result<Clause, MonitrcError> {
        let spec = match text.strip_prefix("with") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => text,
        };
        let (keyword, argument) = spec
            .split_once(char::is_whitespace)
            .map(|(k, a)| (k, a.trim()))
            .unwrap_or((spec, ""));

        let invalid = |reason: String| MonitrcError::InvalidClause {
            check: self.check_name(),
            clause: "pid",
            reason,
        };
        if argument.is_empty() && matches!(keyword, "pidfile" | "matching") {
            return Err(invalid(format!("{keyword} requires an argument")));
        }
        match keyword {
            "pidfile" => Ok(Clause::Pidfile(strip_quotes(argument))),
            "matching" => Ok(Clause::Matching(strip_quotes(argument))),
            _ => Err(invalid(format!(
                "expected 'pidfile' or 'matching', found {text:?}"
            ))),
        }
    }

    /// `start program = <path> [as uid <u>] [and gid <g>]`
    fn program(&mut self, clause: &'static str) -> Result<CheckProgram, MonitrcError> {
        self.expect_kind(clause, TokenKind::ProgramPath)?;
        let mut program = CheckProgram {
            path: self.value(clause)?,
            ..Default::default()
        };

        while let Some(kind @ (TokenKind::Uid | TokenKind::Gid)) = self.peek_kind() {
            let marker = self.next_token(clause)?;
            let slot = if kind == TokenKind::Uid {
                &mut program.uid
            } else {
                &mut program.gid
            };
            if slot.is_some() {
                return Err(MonitrcError::InvalidClause {
                    check: self.check_name(),
                    clause,
                    reason: format!("duplicate {}", marker.text),
                });
            }
            *slot = Some(self.value(clause)?);
        }
        Ok(program)
    }

    /// `if failed unixsocket ...` 또는 `if failed host ... port ... protocol ...`
    fn connection_test(&mut self) -> Result<Clause, MonitrcError> {
        const CLAUSE: &str = "if failed";
        let first = self.next_token(CLAUSE)?;
        match first.kind {
            TokenKind::UnixSocket => {
                let socket_file = self.value(CLAUSE)?;
                let conditions = self.conditions(CLAUSE)?;
                Ok(Clause::FailedSocket(FailedSocket {
                    socket_file,
                    timeout_seconds: conditions.timeout_seconds,
                    num_cycles: conditions.num_cycles,
                    action: conditions.action,
                }))
            }
            TokenKind::Host | TokenKind::Port | TokenKind::Protocol => {
                let mut host = FailedHost::default();
                let mut kind = first.kind;
                loop {
                    let value = self.value(CLAUSE)?;
                    match kind {
                        TokenKind::Host => host.host = value,
                        TokenKind::Port => host.port = value,
                        _ => host.protocol = value,
                    }
                    match self.peek_kind() {
                        Some(next @ (TokenKind::Host | TokenKind::Port | TokenKind::Protocol)) => {
                            self.tokens.next();
                            kind = next;
                        }
                        _ => break,
                    }
                }
                let conditions = self.conditions(CLAUSE)?;
                host.timeout_seconds = conditions.timeout_seconds;
                host.num_cycles = conditions.num_cycles;
                host.action = conditions.action;
                Ok(Clause::FailedHost(host))
            }
            _ => Err(self.unexpected(CLAUSE, "unixsocket, host, port or protocol", &first)),
        }
    }

    /// `if total memory <op> <limit> [for <n> cycles] then <action>`
    fn resource_test(&mut self) -> Result<MemUsage, MonitrcError> {
        const CLAUSE: &str = "if total memory";
        let operator = self.expect_kind(CLAUSE, TokenKind::ResourceOperator)?.text;
        let limit = self.value(CLAUSE)?;

        let digits = limit
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(limit.len());
        let mem_limit = limit[..digits]
            .parse::<u64>()
            .map_err(|_| MonitrcError::InvalidNumber {
                check: self.check_name(),
                field: "memory limit",
                text: limit.clone(),
            })?;
        let unit = limit[digits..].trim().to_owned();

        let conditions = self.conditions(CLAUSE)?;
        if conditions.timeout_seconds.is_some() {
            return Err(self.not_allowed(CLAUSE, "timeout"));
        }
        Ok(MemUsage {
            operator,
            mem_limit,
            unit,
            num_cycles: conditions.num_cycles,
            action: conditions.action,
        })
    }

    /// `if changed <attribute> then <action>`
    fn change_test(&mut self) -> Result<Clause, MonitrcError> {
        const CLAUSE: &str = "if changed";
        let attribute = self.value(CLAUSE)?;
        let conditions = self.conditions(CLAUSE)?;
        if conditions.timeout_seconds.is_some() {
            return Err(self.not_allowed(CLAUSE, "timeout"));
        }
        if conditions.num_cycles.is_some() {
            return Err(self.not_allowed(CLAUSE, "cycles"));
        }
        Ok(Clause::IfChanged {
            attribute,
            action: conditions.action,
        })
    }

    /// 조건 절: `with timeout <n> [unit]`, `for <n> [cycles]`, 종료 표식, `then <action>`
    fn conditions(&mut self, clause: &'static str) -> Result<Conditions, MonitrcError> {
        let mut conditions = Conditions::default();
        loop {
            let token = self.next_token(clause)?;
            match token.kind {
                TokenKind::Timeout => {
                    let text = self.value(clause)?;
                    conditions.timeout_seconds = Some(self.number("timeout", &text)?);
                    self.optional_value();
                }
                TokenKind::Cycles => {
                    let text = self.value(clause)?;
                    conditions.num_cycles = Some(self.number("cycles", &text)?);
                    self.optional_value();
                }
                TokenKind::ConnectionTestExit => {}
                TokenKind::Action => {
                    conditions.action = self.value(clause)?;
                    return Ok(conditions);
                }
                _ => return Err(self.unexpected(clause, "then", &token)),
            }
        }
    }
}

/// 성공하면 `None`, 이 check 종류에 맞지 않으면 절을 그대로 돌려줍니다.
fn apply_to_process(check: &mut ProcessCheck, clause: Clause) -> Option<Clause> {
    match clause {
        Clause::Name(name) => check.name = name,
        Clause::Pidfile(path) => check.pidfile = path,
        Clause::Matching(pattern) => check.matching = pattern,
        Clause::StartProgram(program) => check.start_program = Some(program),
        Clause::StopProgram(program) => check.stop_program = Some(program),
        Clause::Group(group) => check.group = group,
        Clause::DependsOn(target) => check.depends_on = target,
        Clause::FailedSocket(socket) => check.failed_socket = Some(socket),
        Clause::FailedHost(host) => check.failed_host = Some(host),
        Clause::MemUsage(usage) => check.total_mem_checks.push(usage),
        other @ (Clause::Path(_) | Clause::IfChanged { .. }) => return Some(other),
    }
    None
}

fn apply_to_file(check: &mut FileCheck, clause: Clause) -> Option<Clause> {
    match clause {
        Clause::Name(name) => check.name = name,
        Clause::Path(path) => check.path = path,
        Clause::IfChanged { attribute, action } => {
            check.if_changed = attribute;
            check.if_changed_action = action;
        }
        Clause::StartProgram(program) => check.start_program = Some(program),
        Clause::StopProgram(program) => check.stop_program = Some(program),
        Clause::Group(group) => check.group = group,
        Clause::DependsOn(target) => check.depends_on = target,
        Clause::FailedSocket(socket) => check.failed_socket = Some(socket),
        Clause::FailedHost(host) => check.failed_host = Some(host),
        Clause::MemUsage(usage) => check.total_mem_checks.push(usage),
        other @ (Clause::Pidfile(_) | Clause::Matching(_)) => return Some(other),
    }
    None
}

/// 값을 감싼 큰따옴표 한 쌍을 제거합니다. 안쪽 따옴표는 그대로 둡니다.
fn strip_quotes(text: &str) -> String {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
        .to_owned()
}
