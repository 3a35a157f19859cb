#![allow(dead_code)]
#![deny(clippy::all)]
//#![warn(missing_docs)]

//! A dynamically-typed configuration value: a strict text grammar, a
//! relaxed CLI-argument grammar, a coercion engine between the value
//! kinds, and a typed extraction protocol for reading Rust types back
//! out of a parsed value tree.

pub mod coerce;
pub mod error;
pub mod extract;
mod fmt;
pub mod inspect;
mod lex;
pub mod parse;
pub mod timespan;
pub mod value;

// Public re-exports
#[doc(no_inline)]
pub use error::{Error, Result};
#[doc(no_inline)]
pub use extract::{get_as_inspect, GetAs, StringEnum};
#[doc(no_inline)]
pub use inspect::{read_nested, write_nested, DictionaryReader, DictionaryWriter, Inspect, Reader, Writer};
#[doc(no_inline)]
pub use parse::cli::{apply_cli_shortcuts, parse_cli, TargetShape};
#[doc(no_inline)]
pub use parse::parse;
#[doc(no_inline)]
pub use timespan::Timespan;
#[doc(no_inline)]
pub use value::{Uri, Value};
