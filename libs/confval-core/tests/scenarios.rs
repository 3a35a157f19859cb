//! End-to-end coverage of the nine concrete parse/coerce/extract
//! scenarios, exercised the way a caller actually uses the crate:
//! `parse` → `get_as`/`to_string`, not unit tests against one module
//! in isolation.

use indexmap::IndexMap;

use confval::{self, parse_cli, Error, Inspect, Reader, TargetShape, Value, Writer};

#[test]
fn scenario_1_plain_integer() {
    let v = confval::parse("32768").unwrap();
    assert_eq!(v, Value::Integer(32768));
    assert!(v.get_as::<i16>().is_err());
    assert_eq!(v.get_as::<u16>().unwrap(), 32768u16);
}

#[test]
fn scenario_2_real() {
    let v = confval::parse("50.05").unwrap();
    assert_eq!(v, Value::Real(50.05));
    assert!(v.get_as::<i64>().is_err());
    assert_eq!(v.get_as::<f64>().unwrap(), 50.05);
}

#[test]
fn scenario_3_timespan() {
    let v = confval::parse("10ms").unwrap();
    assert_eq!(v.to_string(), "10ms");
    assert!(v.get_as::<i64>().is_err());
}

#[test]
fn scenario_4_list() {
    let v = confval::parse("[1, 2, 3]").unwrap();
    assert_eq!(v.get_as::<Vec<i64>>().unwrap(), vec![1, 2, 3]);
    assert_eq!(v.to_string(), "[1, 2, 3]");
}

#[test]
fn scenario_5_dictionary() {
    let v = confval::parse("{a=1,b=2,c=3}").unwrap();
    let map: IndexMap<String, i64> = v.get_as().unwrap();
    assert_eq!(map.get("a"), Some(&1));
    assert_eq!(map.get("b"), Some(&2));
    assert_eq!(map.get("c"), Some(&3));

    let pairs = v.to_list().unwrap();
    assert_eq!(
        pairs,
        vec![
            Value::List(vec![Value::String("a".into()), Value::Integer(1)]),
            Value::List(vec![Value::String("b".into()), Value::Integer(2)]),
            Value::List(vec![Value::String("c".into()), Value::Integer(3)]),
        ]
    );
}

#[derive(Debug, PartialEq)]
struct Point3 {
    x: i64,
    y: i64,
    z: i64,
}

impl Inspect for Point3 {
    fn read(reader: &mut dyn Reader) -> Result<Self, Error> {
        Ok(Point3 {
            x: reader.field("x", false)?.expect("required").get_as()?,
            y: reader.field("y", false)?.expect("required").get_as()?,
            z: reader.field("z", false)?.expect("required").get_as()?,
        })
    }

    fn write(&self, writer: &mut dyn Writer) {
        writer.field("x", Value::Integer(self.x));
        writer.field("y", Value::Integer(self.y));
        writer.field("z", Value::Integer(self.z));
    }
}
confval::impl_get_as_for_inspect!(Point3);

#[derive(Debug, PartialEq)]
struct Line {
    p1: Point3,
    p2: Point3,
}

impl Inspect for Line {
    fn read(reader: &mut dyn Reader) -> Result<Self, Error> {
        Ok(Line {
            p1: confval::read_nested(reader, "p1", false)?.expect("required"),
            p2: confval::read_nested(reader, "p2", false)?.expect("required"),
        })
    }

    fn write(&self, writer: &mut dyn Writer) {
        confval::write_nested(writer, "p1", &self.p1);
        confval::write_nested(writer, "p2", &self.p2);
    }
}
confval::impl_get_as_for_inspect!(Line);

#[test]
fn scenario_6_nested_record_via_inspection_protocol() {
    let v = confval::parse("{p1{x=1,y=2,z=3},p2{x=10,y=20,z=30}}").unwrap();
    let line: Line = v.get_as().unwrap();
    assert_eq!(
        line,
        Line { p1: Point3 { x: 1, y: 2, z: 3 }, p2: Point3 { x: 10, y: 20, z: 30 } }
    );
}

#[test]
fn scenario_7_trailing_character() {
    assert!(matches!(confval::parse("10msb"), Err(Error::TrailingCharacter { .. })));
}

#[test]
fn scenario_8_unexpected_character() {
    assert!(matches!(confval::parse("{a=,"), Err(Error::UnexpectedCharacter { .. })));
}

#[test]
fn scenario_9_cli_shortcut_grammar() {
    let as_ints = parse_cli(" 1,2 , 3  ,", TargetShape::ListOfScalar).unwrap();
    assert_eq!(as_ints, Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]));

    let as_strings = parse_cli(" 1,2 , 3  ,", TargetShape::ListOfScalar).unwrap().get_as::<Vec<String>>().unwrap();
    assert_eq!(as_strings, vec!["1".to_string(), "2".to_string(), "3".to_string()]);

    assert!(parse_cli("123]", TargetShape::ListOfScalar).is_err());
}
