//! The typed extraction protocol (component C5): `get_as<T>`, realized
//! in Rust as the [`GetAs`] trait so callers write `value.get_as::<T>()`
//! instead of one differently-named accessor per target type.
//!
//! Grounded on the teacher's pair of small, independently-constructible
//! value types, each reached through its own `TryFrom`/`FromStr` rather
//! than one combinatorial converter; `GetAs` generalizes that
//! one-impl-per-target shape across an open set of target types instead
//! of just two.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use indexmap::IndexMap;

use crate::coerce::{narrow_integer, narrow_real_to_f32};
use crate::error::Error;
use crate::inspect::{DictionaryReader, Inspect};
use crate::timespan::Timespan;
use crate::value::{Uri, Value};

/// A type that can be extracted out of a borrowed [`Value`] by
/// `value.get_as::<Self>()`.
pub trait GetAs: Sized {
    fn get_as(value: &Value) -> Result<Self, Error>;
}

impl Value {
    /// Extracts a `T` from this value via [`GetAs`]. The turbofish at
    /// the call site (`value.get_as::<u16>()`) plays the role
    /// `get_as<T>` plays in the abstract model.
    pub fn get_as<T: GetAs>(&self) -> Result<T, Error> {
        T::get_as(self)
    }
}

impl GetAs for Value {
    fn get_as(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl GetAs for bool {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_boolean()
    }
}

impl GetAs for i64 {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_integer()
    }
}

impl GetAs for f64 {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_real()
    }
}

impl GetAs for f32 {
    fn get_as(value: &Value) -> Result<Self, Error> {
        narrow_real_to_f32(value.to_real()?)
    }
}

impl GetAs for Timespan {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_timespan()
    }
}

impl GetAs for String {
    fn get_as(value: &Value) -> Result<Self, Error> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Uri(u) => Ok(u.as_str().to_string()),
            other => Ok(other.to_string()),
        }
    }
}

impl GetAs for Uri {
    fn get_as(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Uri(u) => Ok(u.clone()),
            Value::String(s) => Ok(Uri::new(s.clone())),
            other => Err(Error::conversion_failed(other.type_name(), "uri", "unsupported source variant")),
        }
    }
}

macro_rules! impl_get_as_narrow_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl GetAs for $t {
                fn get_as(value: &Value) -> Result<Self, Error> {
                    narrow_integer(value.to_integer()?)
                }
            }
        )*
    };
}
impl_get_as_narrow_integer!(i8, i16, i32, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: GetAs> GetAs for Vec<T> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_list()?.iter().map(T::get_as).collect()
    }
}

impl<T: GetAs> GetAs for VecDeque<T> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_list()?.iter().map(T::get_as).collect()
    }
}

impl<T: GetAs + Eq + Hash> GetAs for HashSet<T> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_list()?.iter().map(T::get_as).collect()
    }
}

impl<T: GetAs + Ord> GetAs for BTreeSet<T> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_list()?.iter().map(T::get_as).collect()
    }
}

impl<U: GetAs> GetAs for IndexMap<String, U> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_dictionary()?.iter().map(|(k, v)| Ok((k.clone(), U::get_as(v)?))).collect()
    }
}

impl<U: GetAs> GetAs for HashMap<String, U> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_dictionary()?.iter().map(|(k, v)| Ok((k.clone(), U::get_as(v)?))).collect()
    }
}

impl<U: GetAs> GetAs for BTreeMap<String, U> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        value.to_dictionary()?.iter().map(|(k, v)| Ok((k.clone(), U::get_as(v)?))).collect()
    }
}

impl<T: GetAs> GetAs for Option<T> {
    fn get_as(value: &Value) -> Result<Self, Error> {
        match value {
            Value::None => Ok(None),
            other => T::get_as(other).map(Some),
        }
    }
}

macro_rules! impl_get_as_tuple {
    ($($idx:tt => $t:ident),+) => {
        impl<$($t: GetAs),+> GetAs for ($($t,)+) {
            fn get_as(value: &Value) -> Result<Self, Error> {
                let items = value.to_list()?;
                const ARITY: usize = impl_get_as_tuple!(@count $($t),+);
                if items.len() != ARITY {
                    return Err(Error::conversion_failed(
                        value.type_name(),
                        "tuple",
                        format!("expected a list of {ARITY} elements, got {}", items.len()),
                    ));
                }
                Ok(($($t::get_as(&items[$idx])?,)+))
            }
        }
    };
    (@count $($t:ident),+) => {
        <[()]>::len(&[$(impl_get_as_tuple!(@unit $t)),+])
    };
    (@unit $t:ident) => { () };
}

impl_get_as_tuple!(0 => A);
impl_get_as_tuple!(0 => A, 1 => B);
impl_get_as_tuple!(0 => A, 1 => B, 2 => C);
impl_get_as_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
impl_get_as_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_get_as_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_get_as_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
impl_get_as_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);

/// A marker for simple C-like enums whose canonical textual form is
/// just their variant name, so they can ride the `string` grammar atom
/// without a bespoke grammar rule of their own.
///
/// Stable Rust has no specialization, so a blanket `GetAs` impl over
/// `StringEnum` (or over [`Inspect`]) would conflict with the concrete
/// impls above. [`impl_get_as_for_string_enum`] and
/// [`impl_get_as_for_inspect`] generate the per-type impl instead —
/// the same one-macro-invocation-per-type shape the teacher uses for
/// `impl_tag_consts!` in `tag.rs`.
pub trait StringEnum: Sized {
    fn from_name(name: &str) -> Result<Self, Error>;
}

/// Derives `GetAs` for a [`StringEnum`] type by coercing the source
/// value to a string and looking up the variant by name.
#[macro_export]
macro_rules! impl_get_as_for_string_enum {
    ($t:ty) => {
        impl $crate::GetAs for $t {
            fn get_as(value: &$crate::Value) -> Result<Self, $crate::Error> {
                let name: String = $crate::GetAs::get_as(value)?;
                <$t as $crate::StringEnum>::from_name(&name)
            }
        }
    };
}

/// Derives `GetAs` for an [`Inspect`] type by coercing the source value
/// to a dictionary and reading it through [`DictionaryReader`].
#[macro_export]
macro_rules! impl_get_as_for_inspect {
    ($t:ty) => {
        impl $crate::GetAs for $t {
            fn get_as(value: &$crate::Value) -> Result<Self, $crate::Error> {
                let dict = value.to_dictionary()?;
                let mut reader = $crate::DictionaryReader::new(&dict);
                <$t as $crate::Inspect>::read(&mut reader)
            }
        }
    };
}

/// Non-macro equivalent of [`impl_get_as_for_inspect`], for call sites
/// that already know their concrete `T: Inspect` and don't want to
/// define a `GetAs` impl for it.
pub fn get_as_inspect<T: Inspect>(value: &Value) -> Result<T, Error> {
    let dict = value.to_dictionary()?;
    let mut reader = DictionaryReader::new(&dict);
    T::read(&mut reader)
}
