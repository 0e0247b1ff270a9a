//! 스캐너 상태와 문법 디스패치 테이블
//!
//! 각 상태에서 인식하는 키워드는 [`Rule`] 테이블로 선언되며, 테이블 순서가 곧
//! 우선순위입니다. 규칙이 일치하면 표식 토큰을 내보내고, 규칙의 [`Operand`]만큼
//! 값을 읽은 뒤 `next` 상태로 이동합니다.

use tracing::trace;

use super::{Scanner, is_space};
use crate::token::TokenKind;

/// 스캐너 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// 최상위: `check` 지시어 대기
    CheckStart,
    /// `process` 키워드 소비
    ProcessStart,
    /// `file` 키워드 소비
    FileStart,
    ProcessName,
    /// PID 지정 줄 (선택)
    ProcessPid,
    FileName,
    FilePath,
    /// 메서드 블록 (start/stop, uid/gid, group, depends, if ...)
    Methods,
    /// `if failed` 대상 절 (unixsocket/host/port/protocol/then)
    ConnectionTest,
    /// 조건 절 (with timeout / for)
    InsideConnectionTest,
    /// 조건 절 종료 표식 이후. 일치하는 절이 없으면 메서드 블록으로 돌아감
    ConnectionTestExited,
    /// `if total memory` 연산자/한계값/주기
    ResourceTest,
}

/// 규칙이 표식 뒤에 읽는 피연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// 없음
    None,
    /// 문자열 값 하나
    Value,
    /// 문자열 값 둘 (`5 seconds`, `3 cycles`)
    Pair,
    /// `= <value>` 형태의 프로그램 선언
    Program,
}

/// 문법 규칙: 키워드 시퀀스 → 토큰 종류, 피연산자, 다음 상태
#[derive(Debug)]
pub(crate) struct Rule {
    pub words: &'static [&'static str],
    pub label: &'static str,
    pub kind: TokenKind,
    pub operand: Operand,
    pub next: State,
}

const fn rule(
    words: &'static [&'static str],
    label: &'static str,
    kind: TokenKind,
    operand: Operand,
    next: State,
) -> Rule {
    Rule {
        words,
        label,
        kind,
        operand,
        next,
    }
}

/// 메서드 블록 지시어
const METHOD_RULES: &[Rule] = &[
    rule(&["start"], "start program", TokenKind::StartProgram, Operand::Program, State::Methods),
    rule(&["stop"], "stop program", TokenKind::StopProgram, Operand::Program, State::Methods),
    rule(&["as", "uid"], "uid", TokenKind::Uid, Operand::Value, State::Methods),
    rule(&["and", "gid"], "gid", TokenKind::Gid, Operand::Value, State::Methods),
    rule(&["group"], "group", TokenKind::Group, Operand::Value, State::Methods),
    rule(&["depends", "on"], "depends on", TokenKind::DependsOn, Operand::Value, State::Methods),
    rule(
        &["if", "failed"],
        "if failed",
        TokenKind::ConnectionTestEnter,
        Operand::None,
        State::ConnectionTest,
    ),
    rule(
        &["if", "total", "memory"],
        "if total memory",
        TokenKind::ResourceTest,
        Operand::None,
        State::ResourceTest,
    ),
    rule(
        &["if", "changed"],
        "if changed",
        TokenKind::IfChanged,
        Operand::Value,
        State::ConnectionTest,
    ),
];

/// `if failed` 대상 절과 동작 절
const CONNECTION_RULES: &[Rule] = &[
    rule(
        &["unixsocket"],
        "unixsocket",
        TokenKind::UnixSocket,
        Operand::Value,
        State::InsideConnectionTest,
    ),
    rule(&["host"], "host", TokenKind::Host, Operand::Value, State::ConnectionTest),
    rule(&["port"], "port", TokenKind::Port, Operand::Value, State::ConnectionTest),
    rule(&["protocol"], "protocol", TokenKind::Protocol, Operand::Value, State::ConnectionTest),
    rule(&["then"], "then", TokenKind::Action, Operand::Value, State::Methods),
];

/// 연결 테스트 조건 절
const CONDITION_RULES: &[Rule] = &[
    rule(
        &["with", "timeout"],
        "with timeout",
        TokenKind::Timeout,
        Operand::Pair,
        State::InsideConnectionTest,
    ),
    rule(&["for"], "for", TokenKind::Cycles, Operand::Pair, State::InsideConnectionTest),
];

/// 리소스 테스트 조건 절
const RESOURCE_RULES: &[Rule] = &[rule(
    &["for"],
    "for",
    TokenKind::Cycles,
    Operand::Pair,
    State::ResourceTest,
)];

/// 메모리 한계값 단위 문자
const MEMORY_UNIT_CHARS: &str = "%kmgbKMGB";

/// 리소스 비교 연산자 문자
const OPERATOR_CHARS: &str = "<>=";

impl<'a> Scanner<'a> {
    /// 상태 함수 하나를 실행하고 다음 상태를 돌려줍니다. `None`이면 스캔 종료입니다.
    pub(super) fn step(&mut self, state: State) -> Option<State> {
        trace!(?state, pos = self.pos, "scanner step");
        match state {
            State::CheckStart => self.check_start(),
            State::ProcessStart => {
                self.check_kind("process", TokenKind::CheckProcess, State::ProcessName)
            }
            State::FileStart => self.check_kind("file", TokenKind::CheckFile, State::FileName),
            State::ProcessName => self.process_name(),
            State::ProcessPid => self.process_pid(),
            State::FileName => self.file_name(),
            State::FilePath => self.file_path(),
            State::Methods => self.methods(),
            State::ConnectionTest => self.connection_test(false),
            State::InsideConnectionTest => self.inside_connection_test(),
            State::ConnectionTestExited => self.connection_test(true),
            State::ResourceTest => self.resource_test(),
        }
    }

    fn check_start(&mut self) -> Option<State> {
        self.skip_blank();
        if self.at_eof() {
            return None;
        }
        let Some(end) = self.match_words(&["check"]) else {
            let word = self.current_word();
            return self.fail(format!("expected 'check' directive, found {word:?}"));
        };
        self.pos += end;
        self.emit(TokenKind::CheckStart);

        // process를 먼저 검사: 한 줄에 둘 다 있으면 process로 해석
        let line = self.current_line();
        if line.contains("process") {
            Some(State::ProcessStart)
        } else if line.contains("file") {
            Some(State::FileStart)
        } else {
            self.fail("check must be followed by 'process' or 'file'")
        }
    }

    /// 현재 줄에서 처음 나타나는 `keyword`까지 소비하고 표식을 내보냅니다.
    fn check_kind(&mut self, keyword: &str, kind: TokenKind, next: State) -> Option<State> {
        self.skip_spaces();
        let Some(at) = self.current_line().find(keyword) else {
            return self.fail(format!("check {keyword} missing"));
        };
        self.pos += at + keyword.len();
        self.emit(kind);
        Some(next)
    }

    fn process_name(&mut self) -> Option<State> {
        self.skip_spaces();
        if self.accept_while(|c| !c.is_whitespace()) == 0 {
            return self.fail("check process name missing");
        }
        self.emit(TokenKind::ProcessName);
        Some(State::ProcessPid)
    }

    fn process_pid(&mut self) -> Option<State> {
        self.skip_blank();
        if self.at_eof() {
            return None;
        }
        if self.at_directive() {
            return Some(State::Methods);
        }
        let len = self.line_without_comment().trim_end().len();
        self.pos += len;
        self.emit(TokenKind::ProcessPid);
        Some(State::Methods)
    }

    fn file_name(&mut self) -> Option<State> {
        self.skip_spaces();
        if self.accept_while(|c| !c.is_whitespace()) == 0 {
            return self.fail("check file name missing");
        }
        self.emit(TokenKind::FileName);
        self.skip_blank();
        match self.match_words(&["path"]) {
            Some(end) => {
                self.pos += end;
                self.ignore();
                Some(State::FilePath)
            }
            None => self.fail("check file <path> missing"),
        }
    }

    fn file_path(&mut self) -> Option<State> {
        self.skip_spaces();
        if self.accept_while(|c| !c.is_whitespace()) == 0 {
            return self.fail("check file <path> missing");
        }
        self.emit(TokenKind::FilePath);
        Some(State::Methods)
    }

    fn methods(&mut self) -> Option<State> {
        self.skip_blank();
        if self.at_eof() {
            return None;
        }
        if let Some((rule, end)) = self.first_match(METHOD_RULES) {
            return self.apply(rule, end);
        }
        if self.match_words(&["check"]).is_some() {
            return Some(State::CheckStart);
        }
        let word = self.current_word();
        self.fail(format!("unexpected input {word:?}"))
    }

    fn connection_test(&mut self, exited: bool) -> Option<State> {
        self.skip_blank();
        if let Some((rule, end)) = self.first_match(CONNECTION_RULES) {
            return self.apply(rule, end);
        }
        if exited {
            Some(State::Methods)
        } else {
            Some(State::InsideConnectionTest)
        }
    }

    fn inside_connection_test(&mut self) -> Option<State> {
        self.skip_blank();
        if let Some((rule, end)) = self.first_match(CONDITION_RULES) {
            return self.apply(rule, end);
        }
        self.emit_text(TokenKind::ConnectionTestExit, "");
        Some(State::ConnectionTestExited)
    }

    fn resource_test(&mut self) -> Option<State> {
        self.skip_blank();
        if self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
            // 연산자는 최대 두 글자 (>=, <=, ==)
            self.bump();
            if self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
                self.bump();
            }
            self.emit(TokenKind::ResourceOperator);
            return match self.memory_limit() {
                Ok(()) => Some(State::ResourceTest),
                Err(message) => self.fail(message),
            };
        }
        if let Some((rule, end)) = self.first_match(RESOURCE_RULES) {
            return self.apply(rule, end);
        }
        Some(State::ConnectionTest)
    }

    // --- 규칙 적용 ---

    fn first_match(&self, rules: &'static [Rule]) -> Option<(&'static Rule, usize)> {
        rules
            .iter()
            .find_map(|rule| self.match_words(rule.words).map(|end| (rule, end)))
    }

    fn at_directive(&self) -> bool {
        self.first_match(METHOD_RULES).is_some() || self.match_words(&["check"]).is_some()
    }

    /// 같은 줄의 다음 단어가 어느 테이블의 키워드로 시작하는지 검사합니다.
    fn at_keyword(&mut self) -> bool {
        self.skip_spaces();
        [METHOD_RULES, CONNECTION_RULES, CONDITION_RULES, RESOURCE_RULES]
            .into_iter()
            .any(|rules| self.first_match(rules).is_some())
            || self.match_words(&["check"]).is_some()
    }

    fn apply(&mut self, rule: &Rule, end: usize) -> Option<State> {
        let values = match rule.operand {
            Operand::Program => return self.program(rule.kind, rule.next),
            Operand::None => 0,
            Operand::Value => 1,
            Operand::Pair => 2,
        };
        self.pos += end;
        self.emit_text(rule.kind, rule.label);
        for index in 0..values {
            // 단위는 생략 가능: 다음 키워드를 단위로 읽지 않음
            if index > 0 && self.at_keyword() {
                break;
            }
            if let Err(message) = self.string_value() {
                return self.fail(message);
            }
        }
        Some(rule.next)
    }

    /// `start program = <value>`: `=` 앞의 텍스트가 표식 텍스트가 됩니다.
    fn program(&mut self, kind: TokenKind, next: State) -> Option<State> {
        let line = self.current_line();
        let Some(eq) = line.find('=') else {
            return self.fail("check process start missing '='");
        };
        self.pos += eq;
        self.emit_text(kind, line[..eq].trim_end());
        self.emit_text(TokenKind::ProgramPath, "");
        self.bump();
        if let Err(message) = self.string_value() {
            return self.fail(message);
        }
        Some(next)
    }

    /// 같은 줄의 값 하나를 읽습니다. 값이 없으면 아무것도 내보내지 않습니다.
    fn string_value(&mut self) -> Result<(), String> {
        self.skip_spaces();
        match self.peek() {
            Some('"') => {
                self.bump();
                let line = self.current_line();
                match line.find('"') {
                    Some(close) => {
                        self.pos += close + 1;
                        self.emit(TokenKind::QuotedString);
                        Ok(())
                    }
                    None => Err(format!("check process missing value {line}")),
                }
            }
            Some(c) if !c.is_whitespace() => {
                self.accept_while(|c| !c.is_whitespace());
                self.emit(TokenKind::UnquotedString);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `2048 Mb`, `80%`, `512`: 숫자와 선택적 단위를 값 하나로 내보냅니다.
    fn memory_limit(&mut self) -> Result<(), String> {
        self.skip_spaces();
        if self.accept_while(|c| c.is_ascii_digit()) == 0 {
            return Err("if total memory missing limit".to_owned());
        }
        if self.peek() == Some('.') {
            return Err("if total memory limit must be a whole number".to_owned());
        }
        let digits_end = self.pos;
        self.accept_while(is_space);
        if self.accept_while(|c| MEMORY_UNIT_CHARS.contains(c)) == 0 {
            self.pos = digits_end;
        }
        self.emit(TokenKind::UnquotedString);
        Ok(())
    }

    /// 주석이 허용되면 공백 뒤의 `#`부터 줄 끝까지를 제외한 현재 줄
    fn line_without_comment(&self) -> &'a str {
        let line = self.current_line();
        if !self.options.allow_comments {
            return line;
        }
        let mut prev_space = false;
        for (i, c) in line.char_indices() {
            if c == '#' && prev_space {
                return &line[..i];
            }
            prev_space = c.is_whitespace();
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_rules() -> impl Iterator<Item = &'static Rule> {
        METHOD_RULES
            .iter()
            .chain(CONNECTION_RULES)
            .chain(CONDITION_RULES)
            .chain(RESOURCE_RULES)
    }

    #[test]
    fn rule_words_are_lowercase_keywords() {
        for rule in all_rules() {
            assert!(!rule.words.is_empty());
            for word in rule.words {
                assert!(word.chars().all(|c| c.is_ascii_lowercase()), "{word}");
            }
        }
    }

    #[test]
    fn if_failed_precedes_other_if_directives() {
        let position = |label: &str| METHOD_RULES.iter().position(|r| r.label == label);
        assert!(position("if failed") < position("if total memory"));
        assert!(position("if total memory") < position("if changed"));
    }

    #[test]
    fn program_rules_return_to_methods() {
        for rule in METHOD_RULES.iter().filter(|r| r.operand == Operand::Program) {
            assert_eq!(rule.next, State::Methods);
        }
    }

    #[test]
    fn match_words_allows_extra_spacing() {
        let scanner = Scanner::new("t", "depends \t on x");
        assert_eq!(scanner.match_words(&["depends", "on"]), Some(12));
        let scanner = Scanner::new("t", "dependson x");
        assert_eq!(scanner.match_words(&["depends", "on"]), None);
    }

    #[test]
    fn pid_comment_is_trimmed() {
        let scanner = Scanner::new("t", "with pidfile /tmp/a#b.pid # note");
        assert_eq!(scanner.line_without_comment(), "with pidfile /tmp/a#b.pid ");
    }
}
