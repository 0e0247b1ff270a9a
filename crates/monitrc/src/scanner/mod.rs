//! 제어 파일 스캐너
//!
//! 원문 텍스트를 [`Token`] 시퀀스로 변환하는 손으로 작성한 상태 기계입니다.
//! [`Scanner`]는 `Iterator`를 구현하며, `next()`가 호출될 때마다 토큰이 하나 이상
//! 준비될 때까지만 상태 함수를 실행합니다.
//!
//! 스트림은 항상 정확히 하나의 종료 토큰으로 끝납니다.
//! - 정상 종료: [`TokenKind::Eof`]
//! - 어휘 에러: [`TokenKind::Error`] (텍스트 `<name>:<line>: <message>`)
//!
//! 종료 토큰 이후에는 `None`만 반환합니다.
//!
//! # 사용 예시
//! ```
//! use warden_monitrc::scanner::scan;
//! use warden_monitrc::token::TokenKind;
//!
//! let kinds: Vec<TokenKind> = scan("inline", "check process abc")
//!     .map(|t| t.kind)
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::CheckStart,
//!         TokenKind::CheckProcess,
//!         TokenKind::ProcessName,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

mod states;

use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::trace;

use crate::token::{Token, TokenKind};

use self::states::State;

/// 스캐너 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// 지시어 경계에서 `#`부터 줄 끝까지를 주석으로 건너뛸지 여부
    pub allow_comments: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            allow_comments: true,
        }
    }
}

/// 기본 옵션으로 스캐너를 생성합니다.
///
/// `name`은 에러 메시지에 사용되는 입력 이름입니다.
pub fn scan<'a>(name: &'a str, input: &'a str) -> Scanner<'a> {
    Scanner::new(name, input)
}

/// 옵션을 지정하여 스캐너를 생성합니다.
pub fn scan_with_options<'a>(name: &'a str, input: &'a str, options: ScanOptions) -> Scanner<'a> {
    Scanner::with_options(name, input, options)
}

/// 제어 파일 스캐너
///
/// `start..pos`가 현재 토큰 후보 구간이고, `pending`에는 이미 생성되었지만
/// 아직 소비되지 않은 토큰이 쌓입니다. 상태 함수 하나가 토큰 여러 개를
/// 만들 수 있기 때문입니다 (예: `start program` 뒤의 경로 표식과 값).
pub struct Scanner<'a> {
    name: &'a str,
    input: &'a str,
    start: usize,
    pos: usize,
    state: Option<State>,
    pending: VecDeque<Token>,
    options: ScanOptions,
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// 기본 옵션으로 새 스캐너를 생성합니다.
    pub fn new(name: &'a str, input: &'a str) -> Self {
        Self::with_options(name, input, ScanOptions::default())
    }

    /// 옵션을 지정하여 새 스캐너를 생성합니다.
    pub fn with_options(name: &'a str, input: &'a str, options: ScanOptions) -> Self {
        Self {
            name,
            input,
            start: 0,
            pos: 0,
            state: Some(State::CheckStart),
            pending: VecDeque::new(),
            options,
            finished: false,
        }
    }

    // --- 커서 헬퍼 ---

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// 조건을 만족하는 문자를 소비하고, 소비한 문자 수를 돌려줍니다.
    fn accept_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
            count += 1;
        }
        count
    }

    /// 지금까지 소비한 구간을 토큰 없이 버립니다.
    fn ignore(&mut self) {
        self.start = self.pos;
    }

    /// 같은 줄 안의 공백/탭만 건너뜁니다.
    fn skip_spaces(&mut self) {
        self.accept_while(is_space);
        self.ignore();
    }

    /// 줄바꿈을 포함한 공백과 (허용 시) 주석을 건너뜁니다.
    fn skip_blank(&mut self) {
        loop {
            self.accept_while(char::is_whitespace);
            if self.options.allow_comments && self.peek() == Some('#') {
                self.accept_while(|c| c != '\n');
                continue;
            }
            break;
        }
        self.ignore();
    }

    /// 현재 위치부터 줄 끝까지 (줄바꿈 제외)
    fn current_line(&self) -> &'a str {
        let rest = self.rest();
        match rest.find('\n') {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    /// 에러 메시지용: 현재 위치의 단어
    fn current_word(&self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..end];
        match word.char_indices().nth(32) {
            Some((cut, _)) => &word[..cut],
            None => word,
        }
    }

    fn line_number(&self) -> usize {
        self.input[..self.pos].matches('\n').count() + 1
    }

    /// 현재 위치가 키워드 시퀀스로 시작하는지 검사합니다.
    ///
    /// 키워드 사이에는 공백/탭이 하나 이상 있어야 하고, 마지막 키워드 뒤는
    /// 단어 경계여야 합니다. 일치하면 현재 위치 기준 끝 오프셋을 돌려줍니다.
    fn match_words(&self, words: &[&str]) -> Option<usize> {
        let rest = self.rest();
        let mut offset = 0;
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                let tail = &rest[offset..];
                let gap = tail.len() - tail.trim_start_matches([' ', '\t']).len();
                if gap == 0 {
                    return None;
                }
                offset += gap;
            }
            if !rest[offset..].starts_with(word) {
                return None;
            }
            offset += word.len();
        }
        match rest[offset..].chars().next() {
            Some(c) if c.is_alphanumeric() || c == '_' => None,
            _ => Some(offset),
        }
    }

    // --- 토큰 생성 ---

    /// `start..pos` 구간을 토큰으로 내보냅니다.
    fn emit(&mut self, kind: TokenKind) {
        let input = self.input;
        self.push(Token::new(kind, &input[self.start..self.pos]));
    }

    /// 원문 구간과 무관한 텍스트로 토큰을 내보냅니다.
    fn emit_text(&mut self, kind: TokenKind, text: &str) {
        self.push(Token::new(kind, text));
    }

    fn push(&mut self, token: Token) {
        trace!(kind = %token.kind, text = token.text.as_str(), "scanned token");
        self.pending.push_back(token);
        self.start = self.pos;
    }

    /// 에러 토큰을 내보내고 스캔을 끝냅니다.
    fn fail(&mut self, message: impl AsRef<str>) -> Option<State> {
        let text = format!("{}:{}: {}", self.name, self.line_number(), message.as_ref());
        self.push(Token::new(TokenKind::Error, text));
        self.finished = true;
        None
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            match self.state {
                Some(state) => {
                    self.state = self.step(state);
                }
                None if self.finished => return None,
                None => {
                    self.finished = true;
                    return Some(Token::new(TokenKind::Eof, ""));
                }
            }
        }
    }
}

impl FusedIterator for Scanner<'_> {}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}
