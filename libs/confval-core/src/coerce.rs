//! The coercion engine (component C4): `to_boolean`, `to_integer`,
//! `to_real`, `to_timespan`, `to_list`, `to_dictionary`, and bounded
//! numeric narrowing.
//!
//! Dispatch is a flat `match` on the source variant per target kind,
//! exactly the design note in `spec.md` §9 ("flat match avoids the
//! combinatorial 'overload' style") — the same preference the teacher
//! shows in `vr.rs`, which resolves VR codes through one flat match
//! rather than a deep trait hierarchy.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Error;
use crate::parse;
use crate::timespan::Timespan;
use crate::value::Value;

impl Value {
    /// boolean → identity; string `"true"`/`"false"` → accepted;
    /// everything else (including numeric 0/1) fails.
    pub fn to_boolean(&self) -> Result<bool, Error> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::String(s) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(conversion_failed(self, "boolean", format!("{s:?} is not \"true\" or \"false\""))),
            },
            _ => Err(conversion_failed(self, "boolean", "unsupported source variant")),
        }
    }

    /// integer → identity; real → accepted iff finite, integral, and in
    /// range; string → parsed as integer, then as real applying the real
    /// rule; everything else fails.
    pub fn to_integer(&self) -> Result<i64, Error> {
        match self {
            Value::Integer(n) => Ok(*n),
            Value::Real(r) => real_to_integer(*r).ok_or_else(|| {
                conversion_failed(self, "integer", format!("{r} is not a finite, whole number representable as i64"))
            }),
            Value::String(s) => {
                if let Ok(Value::Integer(n)) = parse_atom_as(s) {
                    return Ok(n);
                }
                match parse_atom_as(s) {
                    Ok(Value::Real(r)) => real_to_integer(r)
                        .ok_or_else(|| conversion_failed(self, "integer", format!("{s:?} is not a whole number"))),
                    _ => Err(conversion_failed(self, "integer", format!("{s:?} is not a valid integer literal"))),
                }
            }
            _ => Err(conversion_failed(self, "integer", "unsupported source variant")),
        }
    }

    /// integer → widened (precision loss accepted silently); real →
    /// identity; string → parsed as real; everything else fails.
    pub fn to_real(&self) -> Result<f64, Error> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Real(r) => Ok(*r),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| conversion_failed(self, "real", format!("{s:?} is not a valid real literal"))),
            _ => Err(conversion_failed(self, "real", "unsupported source variant")),
        }
    }

    /// timespan → identity; string → parsed via the duration grammar;
    /// everything else fails.
    pub fn to_timespan(&self) -> Result<Timespan, Error> {
        match self {
            Value::Timespan(t) => Ok(*t),
            Value::String(s) => crate::lex::scan_standalone_timespan(s),
            _ => Err(conversion_failed(self, "timespan", "unsupported source variant")),
        }
    }

    /// list → identity; dictionary → `[key, value]` pairs in iteration
    /// order; string → list-grammar parse, falling back to a
    /// dictionary-grammar parse converted to pairs; everything else fails.
    pub fn to_list(&self) -> Result<Vec<Value>, Error> {
        match self {
            Value::List(items) => Ok(items.clone()),
            Value::Dictionary(map) => Ok(map
                .iter()
                .map(|(k, v)| Value::List(vec![Value::String(k.clone()), v.clone()]))
                .collect()),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.starts_with('[') {
                    match parse::parse(trimmed) {
                        Ok(Value::List(items)) => return Ok(items),
                        _ => return Err(conversion_failed(self, "list", format!("{s:?} is not a valid list literal"))),
                    }
                }
                if trimmed.starts_with('{') {
                    if let Ok(Value::Dictionary(map)) = parse::parse(trimmed) {
                        return Ok(map
                            .into_iter()
                            .map(|(k, v)| Value::List(vec![Value::String(k), v]))
                            .collect());
                    }
                }
                Err(conversion_failed(self, "list", format!("{s:?} is not a valid list or dictionary literal")))
            }
            _ => Err(conversion_failed(self, "list", "unsupported source variant")),
        }
    }

    /// dictionary → identity; string → dictionary-grammar parse (must
    /// start with `{`); everything else fails.
    pub fn to_dictionary(&self) -> Result<IndexMap<String, Value>, Error> {
        match self {
            Value::Dictionary(map) => Ok(map.clone()),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.starts_with('{') {
                    if let Ok(Value::Dictionary(map)) = parse::parse(trimmed) {
                        return Ok(map);
                    }
                }
                Err(conversion_failed(self, "dictionary", format!("{s:?} is not a valid dictionary literal")))
            }
            _ => Err(conversion_failed(self, "dictionary", "unsupported source variant")),
        }
    }

    /// Dry-run predicate form of [`Value::to_dictionary`]. Does not cache
    /// the parsed form — see the open-question resolution in `DESIGN.md`.
    pub fn can_convert_to_dictionary(&self) -> bool {
        self.to_dictionary().is_ok()
    }
}

fn parse_atom_as(s: &str) -> Result<Value, Error> {
    parse::parse(s.trim())
}

fn real_to_integer(r: f64) -> Option<i64> {
    if !r.is_finite() || r.fract() != 0.0 {
        return None;
    }
    if r < i64::MIN as f64 || r > i64::MAX as f64 {
        return None;
    }
    Some(r as i64)
}

fn conversion_failed(source: &Value, target: &'static str, reason: impl Into<String>) -> Error {
    let err = Error::conversion_failed(source.type_name(), target, reason);
    debug!(%err, "coercion rejected");
    err
}

/// Bounds-checks an already-widened `i64` against a narrower integer
/// target `T`. Unsigned targets fail on negative sources.
pub fn narrow_integer<T>(value: i64) -> Result<T, Error>
where
    T: TryFrom<i64> + 'static,
{
    T::try_from(value).map_err(|_| {
        Error::conversion_failed(
            "integer",
            std::any::type_name::<T>(),
            format!("{value} is out of range for {}", std::any::type_name::<T>()),
        )
    })
}

/// Narrows a 64-bit real to 32-bit, failing if the magnitude exceeds
/// `f32`'s finite range.
pub fn narrow_real_to_f32(value: f64) -> Result<f32, Error> {
    if value.is_finite() && value.abs() > f32::MAX as f64 {
        return Err(Error::conversion_failed(
            "real",
            "f32",
            format!("{value} exceeds the finite range of a 32-bit real"),
        ));
    }
    Ok(value as f32)
}
