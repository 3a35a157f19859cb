//! Error types for parsing, coercion, and typed extraction.
//!
//! One flat `#[derive(Snafu)]` enum, one variant per failure kind, each
//! variant carrying just enough context (byte offsets, type names, field
//! paths) to produce a useful message on its own.

use snafu::Snafu;

/// The closed set of ways a `confval` operation can fail.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// A coercion was rejected: wrong source variant, out-of-range value,
    /// non-integral real, or an unparseable string.
    #[snafu(display("cannot convert {source_type} to {target_type}: {reason}"))]
    ConversionFailed {
        source_type: &'static str,
        target_type: &'static str,
        reason: String,
    },

    /// The parser ran out of input before completing a production.
    #[snafu(display("unexpected end of input{}", context.as_ref().map(|c| format!(" while parsing {c}")).unwrap_or_default()))]
    UnexpectedEof { context: Option<String> },

    /// The parser encountered a byte not permitted in the current
    /// production.
    #[snafu(display("unexpected character {character:?} at byte offset {offset}"))]
    UnexpectedCharacter { character: char, offset: usize },

    /// A value parsed cleanly but non-whitespace input remained.
    #[snafu(display("trailing character(s) starting at byte offset {offset}: {remainder:?}"))]
    TrailingCharacter { offset: usize, remainder: String },

    /// A number literal exceeded 64-bit range.
    #[snafu(display("integer literal {literal:?} overflows 64-bit range"))]
    IntegerOverflow { literal: String },

    /// A string escape sequence was malformed.
    #[snafu(display("invalid escape sequence at byte offset {offset}: {reason}"))]
    InvalidEscapeSequence { offset: usize, reason: String },

    /// The inspection bridge could not find a required field.
    #[snafu(display("missing field `{path}`"))]
    MissingField { path: String },
}

impl Error {
    pub(crate) fn conversion_failed(
        source_type: &'static str,
        target_type: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Error::ConversionFailed {
            source_type,
            target_type,
            reason: reason.into(),
        }
    }

    /// Prefixes a nested inspection-bridge failure's field path with
    /// `parent.`, concatenating path segments with `.` as required by the
    /// error-handling policy. Only `MissingField` and `ConversionFailed`
    /// carry a path-shaped payload; other variants originate from the text
    /// parser and never surface through the inspection bridge.
    pub(crate) fn prefix_field_path(self, parent: &str) -> Self {
        match self {
            Error::MissingField { path } => Error::MissingField {
                path: format!("{parent}.{path}"),
            },
            Error::ConversionFailed {
                source_type,
                target_type,
                reason,
            } => Error::ConversionFailed {
                source_type,
                target_type,
                reason: format!("field `{parent}`: {reason}"),
            },
            other => other,
        }
    }
}

pub type Result<T, E = Error> = ::core::result::Result<T, E>;
