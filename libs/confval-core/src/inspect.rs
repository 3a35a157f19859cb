//! The inspection-protocol bridge (component C6b, `spec.md` §4.6): lets a
//! user record type describe its own fields without hand-writing a
//! `GetAs` impl for each one.
//!
//! Grounded on the teacher's dataset-element walk, which visits a
//! record's fields by name against a backing store; here the backing
//! store is a [`crate::value::Value::Dictionary`] instead of a DICOM
//! dataset.

use indexmap::IndexMap;

use crate::error::Error;
use crate::value::Value;

/// Supplies field values to a type implementing [`Inspect::read`].
pub trait Reader {
    /// Looks up `name`. A genuinely absent required field (`optional ==
    /// false`) is [`Error::MissingField`]; an absent optional field is
    /// `Ok(None)`.
    fn field(&mut self, name: &'static str, optional: bool) -> Result<Option<Value>, Error>;
}

/// Collects field values from a type implementing [`Inspect::write`].
pub trait Writer {
    fn field(&mut self, name: &'static str, value: Value);
}

/// A user record type that can describe itself as a set of named
/// `Value` fields, so it can ride [`crate::extract::GetAs`] and the
/// coercion engine without a manual conversion in either direction.
pub trait Inspect: Sized {
    fn read(reader: &mut dyn Reader) -> Result<Self, Error>;
    fn write(&self, writer: &mut dyn Writer);
}

/// A [`Reader`] backed by an existing dictionary, for reading an
/// [`Inspect`] type out of a parsed [`Value`].
pub struct DictionaryReader<'a> {
    map: &'a IndexMap<String, Value>,
}

impl<'a> DictionaryReader<'a> {
    pub fn new(map: &'a IndexMap<String, Value>) -> Self {
        Self { map }
    }
}

impl<'a> Reader for DictionaryReader<'a> {
    fn field(&mut self, name: &'static str, optional: bool) -> Result<Option<Value>, Error> {
        match self.map.get(name) {
            Some(v) => Ok(Some(v.clone())),
            None if optional => Ok(None),
            None => Err(Error::MissingField { path: name.to_string() }),
        }
    }
}

/// A [`Writer`] that accumulates fields into a fresh dictionary, for
/// writing an [`Inspect`] type back out as a [`Value`].
#[derive(Default)]
pub struct DictionaryWriter {
    map: IndexMap<String, Value>,
}

impl DictionaryWriter {
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    pub fn into_dictionary(self) -> IndexMap<String, Value> {
        self.map
    }
}

impl Writer for DictionaryWriter {
    fn field(&mut self, name: &'static str, value: Value) {
        self.map.insert(name.to_string(), value);
    }
}

/// Reads a nested [`Inspect`] field out of `reader`, prefixing any error
/// the nested read produces with `name.` so a deeply-nested missing
/// field reports its full dotted path rather than just its leaf name.
pub fn read_nested<T: Inspect>(reader: &mut dyn Reader, name: &'static str, optional: bool) -> Result<Option<T>, Error> {
    let Some(value) = reader.field(name, optional)? else {
        return Ok(None);
    };
    let dict = value.to_dictionary().map_err(|e| e.prefix_field_path(name))?;
    let mut nested = DictionaryReader::new(&dict);
    T::read(&mut nested).map(Some).map_err(|e| e.prefix_field_path(name))
}

/// Writes a nested [`Inspect`] value into `writer` under `name`.
pub fn write_nested<T: Inspect>(writer: &mut dyn Writer, name: &'static str, value: &T) {
    let mut nested = DictionaryWriter::new();
    value.write(&mut nested);
    writer.field(name, Value::Dictionary(nested.into_dictionary()));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
        y: i64,
    }

    impl Inspect for Point {
        fn read(reader: &mut dyn Reader) -> Result<Self, Error> {
            let x = reader.field("x", false)?.expect("required").to_integer()?;
            let y = reader.field("y", false)?.expect("required").to_integer()?;
            Ok(Point { x, y })
        }

        fn write(&self, writer: &mut dyn Writer) {
            writer.field("x", Value::Integer(self.x));
            writer.field("y", Value::Integer(self.y));
        }
    }

    struct Line {
        start: Point,
    }

    impl Inspect for Line {
        fn read(reader: &mut dyn Reader) -> Result<Self, Error> {
            let start = read_nested(reader, "start", false)?.expect("required");
            Ok(Line { start })
        }

        fn write(&self, writer: &mut dyn Writer) {
            write_nested(writer, "start", &self.start);
        }
    }

    #[test]
    fn round_trips_through_dictionary() {
        let line = Line { start: Point { x: 1, y: 2 } };
        let mut writer = DictionaryWriter::new();
        line.write(&mut writer);
        let dict = writer.into_dictionary();

        let mut reader = DictionaryReader::new(&dict);
        let round_tripped = Line::read(&mut reader).unwrap();
        assert_eq!(round_tripped.start.x, 1);
        assert_eq!(round_tripped.start.y, 2);
    }

    #[test]
    fn missing_nested_field_reports_dotted_path() {
        let dict: IndexMap<String, Value> = IndexMap::from([("start".to_string(), Value::Dictionary(IndexMap::from([("x".to_string(), Value::Integer(1))])))]);
        let mut reader = DictionaryReader::new(&dict);
        let err = Line::read(&mut reader).unwrap_err();
        match err {
            Error::MissingField { path } => assert_eq!(path, "start.y"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }
}
