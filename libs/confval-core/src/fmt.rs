//! The canonical printer (component C6): `Value`'s `Display` impl, used
//! as the crate's `to_string`.
//!
//! Follows the split the teacher uses for its own small value types —
//! one canonical textual form per type, produced by `Display` rather
//! than a bespoke `to_string` method, so it composes with
//! `format!`/`{}`/`ToString` the way the rest of the ecosystem expects.

use std::fmt;

use crate::value::Value;

impl fmt::Display for Value {
    /// The top-level canonical form:
    /// - `none` → `null`
    /// - `boolean` → `true`/`false`
    /// - `integer` → plain decimal, a leading `-` only when negative
    /// - `real` → the shortest decimal that round-trips
    /// - `timespan` → delegated to [`crate::Timespan`]'s own `Display`
    /// - `uri` → the URI text, unadorned
    /// - `string` → the text itself, unquoted (this is the one place a
    ///   string never gets quotes — nested strings inside a list or
    ///   dictionary always do, so the grammar can read its own output
    ///   back unambiguously)
    /// - `list` → `[elem, elem, ...]`
    /// - `dictionary` → `{key = value, key = value, ...}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, false)
    }
}

fn write_value(value: &Value, f: &mut fmt::Formatter<'_>, quote_strings: bool) -> fmt::Result {
    match value {
        Value::None => f.write_str("null"),
        Value::Boolean(b) => write!(f, "{b}"),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Real(r) => write!(f, "{}", format_real(*r)),
        Value::Timespan(t) => write!(f, "{t}"),
        Value::Uri(u) => write!(f, "{u}"),
        Value::String(s) => {
            if quote_strings {
                write_quoted(s, f)
            } else {
                f.write_str(s)
            }
        }
        Value::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(item, f, true)?;
            }
            f.write_str("]")
        }
        Value::Dictionary(map) => {
            f.write_str("{")?;
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_quoted_key(key, f)?;
                f.write_str(" = ")?;
                write_value(value, f, true)?;
            }
            f.write_str("}")
        }
    }
}

/// Formats a real number as the shortest decimal Rust's own formatter
/// produces that still round-trips through `f64::parse`; `{}` on `f64`
/// already guarantees that, but whole-valued reals need a trailing `.0`
/// so they don't print identically to an `integer`.
fn format_real(r: f64) -> String {
    let s = format!("{r}");
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

fn write_quoted(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Dictionary keys only need quoting when they contain characters the
/// strict grammar's bareword key segment can't represent.
fn write_quoted_key(key: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let needs_quoting = key.is_empty()
        || key.chars().any(|c| c.is_whitespace() || matches!(c, '.' | '=' | '{' | '}' | ',' | ']' | '"' | '\''));
    if needs_quoting {
        write_quoted(key, f)
    } else {
        f.write_str(key)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::timespan::Timespan;
    use crate::value::Uri;

    #[test]
    fn scalars_print_their_canonical_form() {
        assert_eq!(Value::None.to_string(), "null");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Integer(-5).to_string(), "-5");
        assert_eq!(Value::Real(50.05).to_string(), "50.05");
        assert_eq!(Value::Real(4.0).to_string(), "4.0");
        assert_eq!(Value::Timespan(Timespan::from_nanos(10_000_000)).to_string(), "10ms");
        assert_eq!(Value::Uri(Uri::new("https://example.com")).to_string(), "https://example.com");
    }

    #[test]
    fn top_level_string_is_unquoted_but_nested_string_is_quoted() {
        assert_eq!(Value::String("hello world".to_string()).to_string(), "hello world");
        assert_eq!(
            Value::List(vec![Value::String("hello world".to_string())]).to_string(),
            "[\"hello world\"]"
        );
    }

    #[test]
    fn list_prints_comma_space_separated() {
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]).to_string(),
            "[1, 2, 3]"
        );
    }

    #[test]
    fn dictionary_prints_key_equals_value_pairs_in_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Integer(2));
        map.insert("a".to_string(), Value::Integer(1));
        assert_eq!(Value::Dictionary(map).to_string(), "{b = 2, a = 1}");
    }

    #[test]
    fn keys_needing_quoting_are_quoted() {
        let mut map = IndexMap::new();
        map.insert("has space".to_string(), Value::Integer(1));
        assert_eq!(Value::Dictionary(map).to_string(), "{\"has space\" = 1}");
    }

    #[test]
    fn printed_list_round_trips_through_parse() {
        let v = Value::List(vec![Value::Integer(1), Value::String("a b".to_string())]);
        let printed = v.to_string();
        assert_eq!(crate::parse::parse(&printed).unwrap(), v);
    }
}
