// File: src/core/parser.rs
//! Reader for the snapshot format:
//!
//! ```text
//! const CHAR_COUNT = {
//!     "寒": 5,
//!     "己": 9,
//! }
//! ```
//!
//! The declaration prefix is optional, keys are JSON string literals holding
//! exactly one character, and a trailing comma before `}` is allowed.

use crate::core::table::FrequencyTable;
use crate::core::types::Count;
use crate::error::ParseError;
use std::collections::BTreeMap;

const DECLARATION_KEYWORDS: [&str; 3] = ["const", "let", "var"];

/// Parses one snapshot into a table. The whole load fails on the first
/// malformed entry.
pub fn load(source: &str) -> Result<FrequencyTable, ParseError> {
    let mut scanner = Scanner::new(source);
    scanner.skip_declaration()?;
    scanner.expect('{')?;

    let mut counts: BTreeMap<char, Count> = BTreeMap::new();
    loop {
        scanner.skip_trivia();
        match scanner.peek() {
            Some('}') => {
                scanner.bump();
                break;
            }
            Some('"') => {
                let line = scanner.line;
                let key = scanner.string()?;
                let character = single_char(&key)
                    .ok_or(ParseError::KeyNotSingleChar { line, key })?;

                scanner.skip_trivia();
                scanner.expect(':')?;
                scanner.skip_trivia();
                let count_line = scanner.line;
                let raw = scanner.number_token();
                let count = parse_count(&raw, character, count_line)?;

                if counts.insert(character, count).is_some() {
                    return Err(ParseError::DuplicateCharacter { line, character });
                }

                scanner.skip_trivia();
                match scanner.peek() {
                    Some(',') => scanner.bump(),
                    Some('}') => {}
                    Some(c) => return Err(scanner.error(format!("expected `,` or `}}`, found `{c}`"))),
                    None => return Err(scanner.error("unexpected end of input, missing `}`")),
                }
            }
            Some(c) => return Err(scanner.error(format!("expected a quoted key, found `{c}`"))),
            None => return Err(scanner.error("unexpected end of input, missing `}`")),
        }
    }

    scanner.skip_trivia();
    if scanner.peek() == Some(';') {
        scanner.bump();
        scanner.skip_trivia();
    }
    if let Some(c) = scanner.peek() {
        return Err(scanner.error(format!("unexpected `{c}` after closing `}}`")));
    }

    log::debug!("parsed snapshot with {} characters", counts.len());
    Ok(counts.into())
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_count(raw: &str, character: char, line: usize) -> Result<Count, ParseError> {
    // `str::parse` would also take a leading `+`.
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<Count>().map_err(|_| ParseError::InvalidCount {
            line,
            raw: raw.to_string(),
        });
    }
    match raw.strip_prefix('-') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            if digits.bytes().all(|b| b == b'0') {
                Ok(0)
            } else {
                Err(ParseError::NegativeCount {
                    line,
                    character,
                    raw: raw.to_string(),
                })
            }
        }
        _ => Err(ParseError::InvalidCount {
            line,
            raw: raw.to_string(),
        }),
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        // A UTF-8 BOM is common in files saved by editors on Windows.
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self { src, pos: 0, line: 1 }
    }

    fn rest(&self) -> &'a str {
        let src: &'a str = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{wanted}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{wanted}`, found end of input"))),
        }
    }

    /// Whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.bump(),
                Some('/') if self.rest().starts_with("//") => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                self.bump();
            } else {
                break;
            }
        }
        let src: &'a str = self.src;
        &src[start..self.pos]
    }

    /// Consumes `const NAME =` (or `let`/`var`) if present.
    fn skip_declaration(&mut self) -> Result<(), ParseError> {
        self.skip_trivia();
        if self.peek() == Some('{') {
            return Ok(());
        }
        let keyword = self.identifier();
        if !DECLARATION_KEYWORDS.contains(&keyword) {
            return Err(match self.peek() {
                _ if !keyword.is_empty() => {
                    self.error(format!("expected `{{` or a declaration, found `{keyword}`"))
                }
                Some(c) => self.error(format!("expected `{{` or a declaration, found `{c}`")),
                None => self.error("empty snapshot"),
            });
        }
        self.skip_trivia();
        if self.identifier().is_empty() {
            return Err(self.error(format!("expected a name after `{keyword}`")));
        }
        self.skip_trivia();
        self.expect('=')?;
        self.skip_trivia();
        Ok(())
    }

    /// A double-quoted JSON string literal, decoded.
    fn string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.expect('"')?;
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_none() {
                        return Err(self.error("unterminated string"));
                    }
                    self.bump();
                }
                Some('\n') | None => return Err(self.error("unterminated string")),
                Some(_) => self.bump(),
            }
        }
        let literal = &self.src[start..self.pos];
        serde_json::from_str::<String>(literal)
            .map_err(|e| self.error(format!("bad string literal {literal}: {e}")))
    }

    fn number_token(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '-' | '+' | '.' | '_') {
                self.bump();
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_string()
    }
}
