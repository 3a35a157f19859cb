//! The CLI-shortcut relaxed grammar (component C3b).
//!
//! Deliberately kept as a pre-pass in front of the strict parser rather
//! than folded into it, so the strict grammar's round-trip laws (parse
//! then print then parse again yields the same value) stay untouched by
//! a convenience layer meant only for command-line argument values.

use std::borrow::Cow;

use crate::error::Error;
use crate::value::Value;

/// Describes the shape the caller expects a CLI argument to coerce into,
/// so [`apply_cli_shortcuts`] knows which relaxation (if any) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// No relaxation: the argument is handed to the strict parser as-is.
    Plain,
    /// A flat list of scalars, e.g. `Vec<i64>`: bare brackets are optional.
    ListOfScalar,
    /// A list of lists, e.g. `Vec<Vec<String>>`: both bracket levels are
    /// optional, and an input with no inner bracket is treated as a
    /// single inner list.
    NestedList,
}

/// Rewrites `input` to add whatever brackets the strict grammar needs,
/// per the target shape, without altering an input that already
/// supplies its own brackets.
pub fn apply_cli_shortcuts<'a>(input: &'a str, target: TargetShape) -> Cow<'a, str> {
    let trimmed = input.trim();
    match target {
        TargetShape::Plain => Cow::Borrowed(input),
        TargetShape::ListOfScalar => {
            if trimmed.starts_with('[') {
                Cow::Borrowed(input)
            } else {
                Cow::Owned(format!("[{trimmed}]"))
            }
        }
        TargetShape::NestedList => {
            if trimmed.starts_with('[') {
                Cow::Borrowed(input)
            } else {
                Cow::Owned(format!("[[{trimmed}]]"))
            }
        }
    }
}

/// Applies the CLI-shortcut rewrite for `target`, then hands the result
/// to the strict parser. Any bracket mismatch introduced by the
/// relaxation (e.g. an input that already contained a stray `]`)
/// surfaces as the strict parser's own `trailing_character` or
/// `unexpected_character` error, not a bespoke CLI error kind.
pub fn parse_cli(input: &str, target: TargetShape) -> Result<Value, Error> {
    let rewritten = apply_cli_shortcuts(input, target);
    super::parse(&rewritten)
}
