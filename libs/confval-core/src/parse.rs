//! The text parser (component C3) and the CLI-shortcut relaxation
//! (component C3b, `spec.md` §4.2).
//!
//! Grounded on the teacher's staged, explicit-failure-point `FromStr`
//! parsing style, generalized here from one fixed-shape literal to the
//! full recursive value/list/dictionary grammar.

pub mod cli;

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::error::{self, Error};
use crate::lex::{Lexer, NumberOrTimespan};
use crate::value::{self, Value};

/// Parses a complete input string into a [`Value`], per the top-level
/// `parse` contract in `spec.md` §4.1:
///
/// 1. Leading whitespace is skipped; all-whitespace (or empty) input is
///    `unexpected_eof`.
/// 2. A single complete value is attempted.
/// 3. If that consumes all remaining (non-whitespace) input, it's returned.
/// 4. Otherwise, if the first non-whitespace character is one of
///    `[ { " '` or a digit, the parse failure is surfaced verbatim.
/// 5. Otherwise, the whole (trimmed) input becomes an unquoted `string`
///    value — the "unescaped fallback".
///
/// ```
/// # use confval::{parse, Value};
/// assert_eq!(parse("32768").unwrap(), Value::Integer(32768));
/// assert_eq!(parse("[1, 2, 3]").unwrap(), Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]));
/// assert_eq!(parse("abc def").unwrap(), Value::String("abc def".to_string()));
/// assert!(parse("10msb").is_err());
/// ```
pub fn parse(input: &str) -> Result<Value, Error> {
    trace!(len = input.len(), "parsing value");
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return error::UnexpectedEofSnafu { context: Some("a value".to_string()) }.fail();
    }

    let mut lexer = Lexer::new(trimmed);
    let attempt = parse_value(&mut lexer).and_then(|value| {
        lexer.skip_trivia();
        if lexer.is_at_end() {
            Ok(value)
        } else {
            error::TrailingCharacterSnafu {
                offset: lexer.pos(),
                remainder: lexer.rest().to_string(),
            }
            .fail()
        }
    });

    match attempt {
        Ok(value) => Ok(value),
        Err(err) => {
            let first = trimmed.chars().next().expect("checked non-empty above");
            if is_strict_first_char(first) {
                warn!(%err, "rejecting input that looked like a structured value");
                Err(err)
            } else {
                trace!("falling back to an unquoted string value");
                Ok(Value::String(trimmed.to_string()))
            }
        }
    }
}

fn is_strict_first_char(c: char) -> bool {
    matches!(c, '[' | '{' | '"' | '\'') || c.is_ascii_digit()
}

/// Parses a single value, recursing into lists/dictionaries as needed.
/// Does not enforce that the whole input is consumed — that's only the
/// top-level `parse` contract's job.
pub(crate) fn parse_value(lexer: &mut Lexer) -> Result<Value, Error> {
    lexer.skip_trivia();
    match lexer.peek() {
        None => error::UnexpectedEofSnafu { context: Some("a value".to_string()) }.fail(),
        Some('[') => parse_list(lexer),
        Some('{') => parse_dictionary(lexer),
        Some('"') | Some('\'') => lexer.scan_quoted_string().map(Value::String),
        Some(c) if c.is_ascii_digit() => lexer.scan_number_or_timespan().map(number_to_value),
        Some(c) if matches!(c, '+' | '-') => lexer.scan_number_or_timespan().map(number_to_value),
        Some(c) if matches!(c, ',' | '=' | ']' | '}') => {
            error::UnexpectedCharacterSnafu { character: c, offset: lexer.pos() }.fail()
        }
        Some(_) => {
            let token = lexer.scan_unquoted_token();
            Ok(match token.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => Value::String(token),
            })
        }
    }
}

fn number_to_value(n: NumberOrTimespan) -> Value {
    match n {
        NumberOrTimespan::Integer(v) => Value::Integer(v),
        NumberOrTimespan::Real(v) => Value::Real(v),
        NumberOrTimespan::Timespan(v) => Value::Timespan(v),
    }
}

fn parse_list(lexer: &mut Lexer) -> Result<Value, Error> {
    expect_char(lexer, '[')?;
    let mut items = Vec::new();
    lexer.skip_trivia();
    if lexer.peek() == Some(']') {
        expect_char(lexer, ']')?;
        return Ok(Value::List(items));
    }
    loop {
        items.push(parse_value(lexer)?);
        lexer.skip_trivia();
        match lexer.peek() {
            Some(',') => {
                expect_char(lexer, ',')?;
                lexer.skip_trivia();
                if lexer.peek() == Some(']') {
                    expect_char(lexer, ']')?;
                    break;
                }
            }
            Some(']') => {
                expect_char(lexer, ']')?;
                break;
            }
            Some(c) => {
                return error::UnexpectedCharacterSnafu { character: c, offset: lexer.pos() }.fail();
            }
            None => return error::UnexpectedEofSnafu { context: Some("a list".to_string()) }.fail(),
        }
    }
    Ok(Value::List(items))
}

fn parse_dictionary(lexer: &mut Lexer) -> Result<Value, Error> {
    expect_char(lexer, '{')?;
    let mut dict = IndexMap::new();
    lexer.skip_trivia();
    if lexer.peek() == Some('}') {
        expect_char(lexer, '}')?;
        return Ok(Value::Dictionary(dict));
    }
    loop {
        let path = parse_key_path(lexer)?;
        lexer.skip_trivia();
        let entry_value = match lexer.peek() {
            Some('=') => {
                expect_char(lexer, '=')?;
                lexer.skip_trivia();
                parse_value(lexer)?
            }
            Some('{') => parse_dictionary(lexer)?,
            Some(c) => return error::UnexpectedCharacterSnafu { character: c, offset: lexer.pos() }.fail(),
            None => return error::UnexpectedEofSnafu { context: Some("a dictionary entry".to_string()) }.fail(),
        };
        value::set_path_in_map(&mut dict, &path, entry_value)?;
        lexer.skip_trivia();
        match lexer.peek() {
            Some(',') => {
                expect_char(lexer, ',')?;
                lexer.skip_trivia();
                if lexer.peek() == Some('}') {
                    expect_char(lexer, '}')?;
                    break;
                }
            }
            Some('}') => {
                expect_char(lexer, '}')?;
                break;
            }
            Some(c) => return error::UnexpectedCharacterSnafu { character: c, offset: lexer.pos() }.fail(),
            None => return error::UnexpectedEofSnafu { context: Some("a dictionary".to_string()) }.fail(),
        }
    }
    Ok(Value::Dictionary(dict))
}

/// Parses a (possibly dotted) dictionary key: `a`, `"a b"`, or `a.b.c`.
fn parse_key_path(lexer: &mut Lexer) -> Result<String, Error> {
    let mut path = parse_key_segment(lexer)?;
    while lexer.peek() == Some('.') {
        let _dot = expect_char(lexer, '.')?;
        path.push('.');
        path.push_str(&parse_key_segment(lexer)?);
    }
    Ok(path)
}

fn parse_key_segment(lexer: &mut Lexer) -> Result<String, Error> {
    match lexer.peek() {
        Some('"') | Some('\'') => lexer.scan_quoted_string(),
        Some(c) if !matches!(c, '.' | '=' | '{' | '}' | ',' | ']') && !c.is_whitespace() => Ok(lexer.scan_key_segment()),
        Some(c) => error::UnexpectedCharacterSnafu { character: c, offset: lexer.pos() }.fail(),
        None => error::UnexpectedEofSnafu { context: Some("a dictionary key".to_string()) }.fail(),
    }
}

fn expect_char(lexer: &mut Lexer, expected: char) -> Result<(), Error> {
    match lexer.peek() {
        Some(c) if c == expected => {
            lexer.bump();
            Ok(())
        }
        Some(c) => error::UnexpectedCharacterSnafu { character: c, offset: lexer.pos() }.fail(),
        None => error::UnexpectedEofSnafu { context: Some(format!("'{expected}'")) }.fail(),
    }
}
