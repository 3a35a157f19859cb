//! The `Value` tagged union (component C2).
//!
//! Shaped after the teacher's own closed, tagged configuration-value enum
//! (`Bool`, `String`, `Int`, `Enum`, `Duration`, `Tag`, `Vr`, `File`,
//! `Vec`, `Map`, `Complex`), narrowed down to exactly the nine variants
//! this crate's grammar and coercion engine are defined over.

use indexmap::IndexMap;
use std::cmp::Ordering;

use crate::error::Error;
use crate::timespan::Timespan;

/// An opaque absolute URI. Construction is infallible — URI syntax
/// validation is out of scope (see `SPEC_FULL.md` §1) — but it is a
/// distinct type from `String` so `type_name()` and coercion dispatch can
/// tell a URI apart from a plain string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uri(pub String);

impl Uri {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dynamically-typed configuration value.
///
/// The discriminant order below is part of the public contract: it is
/// what [`Value::type_name`] and [`Value`]'s `Ord` impl are keyed on, not
/// an incidental detail of the enum's declaration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    None,
    Integer(i64),
    Boolean(bool),
    Real(f64),
    Timespan(Timespan),
    Uri(Uri),
    String(String),
    List(Vec<Value>),
    Dictionary(IndexMap<String, Value>),
}

const TYPE_NAMES: [&str; 9] = [
    "none",
    "integer",
    "boolean",
    "real",
    "timespan",
    "uri",
    "string",
    "list",
    "dictionary",
];

impl Value {
    /// The tag name for the currently-held variant, per the discriminator
    /// order in `SPEC_FULL.md` §3.
    pub fn type_name(&self) -> &'static str {
        TYPE_NAMES[self.discriminant_index() as usize]
    }

    pub(crate) fn discriminant_index(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Integer(_) => 1,
            Value::Boolean(_) => 2,
            Value::Real(_) => 3,
            Value::Timespan(_) => 4,
            Value::Uri(_) => 5,
            Value::String(_) => 6,
            Value::List(_) => 7,
            Value::Dictionary(_) => 8,
        }
    }

    /// Converts this value in place into a list, per the rules in
    /// `spec.md` §3:
    /// - already a list: no-op.
    /// - `none`: becomes an empty list.
    /// - anything else: becomes a single-element list wrapping the
    ///   previous value.
    pub fn convert_to_list(&mut self) {
        match self {
            Value::List(_) => {}
            Value::None => *self = Value::List(Vec::new()),
            other => {
                let previous = std::mem::replace(other, Value::None);
                *other = Value::List(vec![previous]);
            }
        }
    }

    /// Calls [`Value::convert_to_list`], then returns a mutable reference
    /// to the now-guaranteed-list contents.
    pub fn as_list(&mut self) -> &mut Vec<Value> {
        self.convert_to_list();
        match self {
            Value::List(list) => list,
            _ => unreachable!("convert_to_list guarantees a List variant"),
        }
    }

    /// Replaces this value with an empty dictionary unless it already is
    /// one, then returns a mutable reference to the dictionary contents.
    pub fn as_dictionary(&mut self) -> &mut IndexMap<String, Value> {
        if !matches!(self, Value::Dictionary(_)) {
            *self = Value::Dictionary(IndexMap::new());
        }
        match self {
            Value::Dictionary(map) => map,
            _ => unreachable!("just ensured a Dictionary variant"),
        }
    }

    /// Calls [`Value::convert_to_list`] then pushes `v`.
    pub fn append(&mut self, v: Value) {
        self.as_list().push(v);
    }

    /// Looks up a dotted key path (`"a.b.c"`) in a dictionary. A missing
    /// intermediate key, or an intermediate that isn't a dictionary,
    /// simply yields `None` ("not found") rather than an error.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Value::Dictionary(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Sets a dotted key path, creating intermediate dictionaries as
    /// needed. This value is coerced to a dictionary first (per
    /// [`Value::as_dictionary`]) if it isn't one already. Encountering a
    /// non-dictionary value at an intermediate path segment is an error.
    pub fn set_path(&mut self, path: &str, v: Value) -> Result<(), Error> {
        set_path_in_map(self.as_dictionary(), path, v)
    }
}

pub(crate) fn set_path_in_map(map: &mut IndexMap<String, Value>, path: &str, v: Value) -> Result<(), Error> {
    let mut segments = path.split('.');
    let Some(mut key) = segments.next() else {
        return Ok(());
    };
    let mut current = map;
    for next in segments {
        let slot = current.entry(key.to_string()).or_insert_with(|| Value::Dictionary(IndexMap::new()));
        if !matches!(slot, Value::Dictionary(_)) {
            return Err(Error::conversion_failed(
                slot.type_name(),
                "dictionary",
                format!("key `{key}` already holds a non-dictionary value, cannot descend into `{next}`"),
            ));
        }
        current = match slot {
            Value::Dictionary(map) => map,
            _ => unreachable!(),
        };
        key = next;
    }
    current.insert(key.to_string(), v);
    Ok(())
}

impl Default for Value {
    fn default() -> Self {
        Value::None
    }
}

impl PartialEq for Value {
    /// Structural equality: variants must match, then contents must
    /// match (lists element-wise, dictionaries as equal multisets of
    /// `(key, value)` pairs — `IndexMap`'s own `PartialEq` is already
    /// order-independent, which is exactly what `spec.md` §3 asks for).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::Timespan(a), Value::Timespan(b)) => a == b,
            (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Value {}

impl Ord for Value {
    /// Lexicographic by variant index first, then by content, as required
    /// by `spec.md` §3. Dictionaries don't have a natural positional
    /// order (equality is multiset equality), so they're ordered by their
    /// entries sorted by key — a sequence that is itself canonical given
    /// unique keys, so it stays consistent with `PartialEq`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.discriminant_index().cmp(&other.discriminant_index()).then_with(|| match (self, other) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Timespan(a), Value::Timespan(b)) => a.cmp(b),
            (Value::Uri(a), Value::Uri(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Dictionary(a), Value::Dictionary(b)) => {
                let mut a_sorted: Vec<_> = a.iter().collect();
                let mut b_sorted: Vec<_> = b.iter().collect();
                a_sorted.sort_by(|l, r| l.0.cmp(r.0));
                b_sorted.sort_by(|l, r| l.0.cmp(r.0));
                a_sorted.cmp(&b_sorted)
            }
            _ => unreachable!("discriminant already compared equal"),
        })
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}
impl From<Timespan> for Value {
    fn from(v: Timespan) -> Self {
        Value::Timespan(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
impl From<Uri> for Value {
    fn from(v: Uri) -> Self {
        Value::Uri(v)
    }
}
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_follows_discriminator_order() {
        assert_eq!(Value::None.type_name(), "none");
        assert_eq!(Value::Integer(1).type_name(), "integer");
        assert_eq!(Value::Boolean(true).type_name(), "boolean");
        assert_eq!(Value::Real(1.0).type_name(), "real");
        assert_eq!(Value::Timespan(Timespan::from_nanos(1)).type_name(), "timespan");
        assert_eq!(Value::Uri(Uri::new("x")).type_name(), "uri");
        assert_eq!(Value::String("x".into()).type_name(), "string");
        assert_eq!(Value::List(vec![]).type_name(), "list");
        assert_eq!(Value::Dictionary(IndexMap::new()).type_name(), "dictionary");
    }

    #[test]
    fn convert_to_list_rules() {
        let mut v = Value::None;
        v.convert_to_list();
        assert_eq!(v, Value::List(vec![]));

        let mut v = Value::Integer(5);
        v.convert_to_list();
        assert_eq!(v, Value::List(vec![Value::Integer(5)]));

        let mut v = Value::List(vec![Value::Integer(1)]);
        v.convert_to_list();
        assert_eq!(v, Value::List(vec![Value::Integer(1)]));
    }

    #[test]
    fn append_converts_then_pushes() {
        let mut v = Value::Integer(1);
        v.append(Value::Integer(2));
        assert_eq!(v, Value::List(vec![Value::Integer(1), Value::Integer(2)]));
    }

    #[test]
    fn as_dictionary_replaces_non_dictionary() {
        let mut v = Value::Integer(1);
        v.as_dictionary().insert("a".to_string(), Value::Integer(1));
        assert_eq!(v.get_path("a"), Some(&Value::Integer(1)));
    }

    #[test]
    fn dotted_path_get_and_set() {
        let mut v = Value::None;
        v.set_path("a.b.c", Value::Integer(42)).unwrap();
        assert_eq!(v.get_path("a.b.c"), Some(&Value::Integer(42)));
        assert_eq!(v.get_path("a.b"), Some(&Value::Dictionary(IndexMap::from([("c".to_string(), Value::Integer(42))]))));
        assert_eq!(v.get_path("a.x.y"), None);
    }

    #[test]
    fn dotted_path_set_conflict_is_an_error() {
        let mut v = Value::None;
        v.set_path("a", Value::Integer(1)).unwrap();
        assert!(v.set_path("a.b", Value::Integer(2)).is_err());
    }

    #[test]
    fn equality_is_structural_and_dictionary_order_independent() {
        let mut a = IndexMap::new();
        a.insert("x".to_string(), Value::Integer(1));
        a.insert("y".to_string(), Value::Integer(2));
        let mut b = IndexMap::new();
        b.insert("y".to_string(), Value::Integer(2));
        b.insert("x".to_string(), Value::Integer(1));
        assert_eq!(Value::Dictionary(a), Value::Dictionary(b));
    }

    #[test]
    fn ordering_is_variant_index_then_content() {
        assert!(Value::None < Value::Integer(i64::MIN));
        assert!(Value::Integer(1) < Value::Boolean(false));
        assert!(Value::Integer(1) < Value::Integer(2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn with_serde() {
        use serde_test::{assert_de_tokens, assert_ser_tokens, Token};

        assert_ser_tokens(&Value::None, &[Token::UnitVariant { name: "Value", variant: "None" }]);

        let v = Value::Integer(42);
        assert_ser_tokens(&v, &[Token::NewtypeVariant { name: "Value", variant: "Integer" }, Token::I64(42)]);
        assert_de_tokens(&v, &[Token::NewtypeVariant { name: "Value", variant: "Integer" }, Token::I64(42)]);
    }
}
