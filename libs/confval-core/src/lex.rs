//! Primitive atoms and the tokenizer (component C1).
//!
//! The cursor shape — a position into a caller-owned `&str`, advanced one
//! `char` at a time, with byte-offset-carrying [`Error`]s — follows the
//! teacher's own escape-scanning cursor; this module generalizes it from
//! "unescape one already-delimited string" to "tokenize an entire grammar".

use crate::error::{self, Error};
use crate::timespan::{self, Timespan};

/// A cursor over the input being parsed. Allocates only for the strings it
/// produces (quoted/unquoted string tokens); never for bookkeeping.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

/// The result of scanning a numeric literal: it is exactly one of these
/// three, never ambiguous once suffix-matching has run.
pub(crate) enum NumberOrTimespan {
    Integer(i64),
    Real(f64),
    Timespan(Timespan),
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    pub(crate) fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and `#`/`//`/`/* */` comments. An unterminated
    /// block comment simply consumes to end of input — matching the
    /// "parser never partially mutates output on error" policy, since
    /// whatever comes after is going to hit `unexpected_eof` regardless.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ if self.starts_with("//") => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ if self.starts_with("/*") => {
                    self.bump();
                    self.bump();
                    while !self.is_at_end() && !self.starts_with("*/") {
                        self.bump();
                    }
                    if self.starts_with("*/") {
                        self.bump();
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scans a quoted string (`"..."` or `'...'`), applying C-style
    /// escapes. The opening quote must be the current character.
    pub(crate) fn scan_quoted_string(&mut self) -> Result<String, Error> {
        let quote = self.bump().expect("caller checked for opening quote");
        let mut out = String::new();
        loop {
            let offset = self.pos();
            match self.bump() {
                None => return error::UnexpectedEofSnafu { context: Some("a quoted string".to_string()) }.fail(),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.scan_escape(offset)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn scan_escape(&mut self, backslash_offset: usize) -> Result<char, Error> {
        let c = self.bump().context_eof(backslash_offset)?;
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => {
                let hi = self.bump().context_eof(backslash_offset)?;
                let lo = self.bump().context_eof(backslash_offset)?;
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).map_err(|_| {
                    error::Error::InvalidEscapeSequence {
                        offset: backslash_offset,
                        reason: format!("invalid hex escape \\x{hi}{lo}"),
                    }
                })?;
                byte as char
            }
            other => {
                return error::InvalidEscapeSequenceSnafu {
                    offset: backslash_offset,
                    reason: format!("unsupported escape \\{other}"),
                }
                .fail()
            }
        })
    }

    /// Scans an unquoted string/identifier: a run of characters up to
    /// (not including) whitespace, `,`, `=`, `]`, `}`, or end of input.
    /// Caller must have already checked the first character is eligible
    /// to start one.
    pub(crate) fn scan_unquoted_token(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, ',' | '=' | ']' | '}') {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    /// Scans a dictionary-key segment: a run of characters up to (not
    /// including) `.`, `=`, `{`, `}`, `,`, `]`, or whitespace. Caller must
    /// have already checked the first character is eligible.
    pub(crate) fn scan_key_segment(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '.' | '=' | '{' | '}' | ',' | ']') {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    /// Scans a number literal (integer or real, optionally immediately
    /// followed by a timespan suffix). The current character must be an
    /// ASCII digit or a sign followed by one.
    pub(crate) fn scan_number_or_timespan(&mut self) -> Result<NumberOrTimespan, Error> {
        let start = self.pos();
        let negative = match self.peek() {
            Some('+') => {
                self.bump();
                false
            }
            Some('-') => {
                self.bump();
                true
            }
            _ => false,
        };

        let mut is_real = false;
        let radix_kind = if self.peek() == Some('0') && matches!(self.peek2(), Some('x' | 'X')) {
            self.bump();
            self.bump();
            Some(16)
        } else if self.peek() == Some('0') && matches!(self.peek2(), Some('b' | 'B')) {
            self.bump();
            self.bump();
            Some(2)
        } else if self.peek() == Some('0') && matches!(self.peek2(), Some('0'..='7')) {
            self.bump();
            Some(8)
        } else {
            None
        };

        let digits_start = self.pos();
        match radix_kind {
            Some(radix) => {
                while self.peek().is_some_and(|c| c.is_digit(radix)) {
                    self.bump();
                }
            }
            None => {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                if self.peek() == Some('.') {
                    // `1.` and `1.5` are both reals; a lone trailing dot
                    // not followed by a digit is still a real per spec.
                    is_real = true;
                    self.bump();
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                }
                if matches!(self.peek(), Some('e' | 'E')) {
                    let mark = self.pos;
                    self.bump();
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.bump();
                    }
                    if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        is_real = true;
                        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                            self.bump();
                        }
                    } else {
                        // Not actually an exponent (e.g. bare `1e`); back
                        // off so `e` is left for the caller to deal with.
                        self.pos = mark;
                    }
                }
            }
        }

        let literal = &self.input[start..self.pos];
        if digits_start == self.pos {
            return error::UnexpectedCharacterSnafu {
                character: self.peek().unwrap_or('\0'),
                offset: self.pos,
            }
            .fail();
        }

        let number = if is_real {
            let value: f64 = self.input[start..self.pos]
                .parse()
                .map_err(|_| Error::IntegerOverflow { literal: literal.to_string() })?;
            NumberOrTimespan::Real(value)
        } else {
            let digits = &self.input[digits_start..self.pos];
            let radix = radix_kind.unwrap_or(10);
            let magnitude = u64::from_str_radix(digits, radix)
                .map_err(|_| Error::IntegerOverflow { literal: literal.to_string() })?;
            let signed = if negative {
                i64::try_from(magnitude).map(|v| -v).or_else(|_| {
                    if magnitude == (i64::MAX as u64) + 1 {
                        Ok(i64::MIN)
                    } else {
                        Err(())
                    }
                })
            } else {
                i64::try_from(magnitude).map_err(|_| ())
            };
            let signed = signed.map_err(|_| Error::IntegerOverflow { literal: literal.to_string() })?;
            NumberOrTimespan::Integer(signed)
        };

        // A timespan suffix may immediately follow, with no separating
        // whitespace, turning this numeric literal into a timespan atom
        // rather than a plain number.
        const SUFFIXES: &[(&str, i64)] = &[
            ("min", 60_000_000_000),
            ("ns", 1),
            ("us", 1_000),
            ("ms", 1_000_000),
            ("s", 1_000_000_000),
            ("h", 3_600_000_000_000),
        ];
        for (suffix, unit_ns) in SUFFIXES {
            if self.starts_with(suffix) {
                // Don't let "s" match the start of an unrelated identifier
                // glued on without a terminator; that's handled by the
                // caller surfacing a trailing-character error instead.
                for _ in suffix.chars() {
                    self.bump();
                }
                let magnitude = match number {
                    NumberOrTimespan::Integer(v) => v as f64,
                    NumberOrTimespan::Real(v) => v,
                    NumberOrTimespan::Timespan(_) => unreachable!(),
                };
                let nanos = timespan::scale_to_nanos(magnitude, *unit_ns, literal)?;
                return Ok(NumberOrTimespan::Timespan(Timespan::from_nanos(nanos)));
            }
        }

        Ok(number)
    }
}

/// Parses a standalone `<number><suffix>` timespan literal, requiring the
/// entire input (after trimming) to be consumed. Used by
/// [`Timespan`]'s `FromStr` and by [`crate::coerce`]'s string-to-timespan
/// coercion.
pub(crate) fn scan_standalone_timespan(s: &str) -> Result<Timespan, Error> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return error::UnexpectedEofSnafu { context: Some("a timespan".to_string()) }.fail();
    }
    let mut lexer = Lexer::new(trimmed);
    match lexer.scan_number_or_timespan()? {
        NumberOrTimespan::Timespan(t) if lexer.is_at_end() => Ok(t),
        _ => Err(Error::ConversionFailed {
            source_type: "string",
            target_type: "timespan",
            reason: format!("{trimmed:?} has no recognized timespan suffix"),
        }),
    }
}

trait OptionContextEof<T> {
    fn context_eof(self, offset: usize) -> Result<T, Error>;
}
impl<T> OptionContextEof<T> for Option<T> {
    fn context_eof(self, offset: usize) -> Result<T, Error> {
        self.ok_or(Error::UnexpectedEof { context: Some(format!("an escape sequence starting at byte {offset}")) })
    }
}
