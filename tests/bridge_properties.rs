//! Property tests for the Geography object bridge.
//!
//! These check that the non-raising type test agrees with the checked borrow for
//! arbitrary Python values, and that wrapping keeps the native address.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use pyo3::prelude::*;

use spherely::geography::{Geography, LineString, Point};
use spherely::object::PyObjectGeography;

#[derive(Debug, Clone)]
enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    None,
    Point(f64, f64),
    Line(Vec<(f64, f64)>),
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::Text),
        Just(Value::None),
        (-180.0..180.0f64, -90.0..90.0f64).prop_map(|(x, y)| Value::Point(x, y)),
        prop::collection::vec((-180.0..180.0f64, -90.0..90.0f64), 2..6).prop_map(Value::Line),
    ]
}

fn to_object(py: Python<'_>, value: &Value) -> PyObjectGeography {
    match value {
        Value::Int(i) => (*i).into_pyobject(py).unwrap().into_any().into(),
        Value::Float(f) => (*f).into_pyobject(py).unwrap().into_any().into(),
        Value::Text(s) => s.as_str().into_pyobject(py).unwrap().into_any().into(),
        Value::None => py.None().into(),
        Value::Point(x, y) => PyObjectGeography::from_geog(py, Box::new(Point::new(*x, *y))).unwrap(),
        Value::Line(coords) => {
            let line = LineString::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect());
            PyObjectGeography::from_geog(py, Box::new(line)).unwrap()
        }
    }
}

proptest! {
    #[test]
    fn type_test_agrees_with_borrow(v in value()) {
        Python::with_gil(|py| -> Result<(), TestCaseError> {
            let obj = to_object(py, &v);
            let expected = matches!(v, Value::Point(..) | Value::Line(_));
            prop_assert_eq!(obj.is_geog(py), expected);
            prop_assert_eq!(obj.as_geog(py).is_ok(), obj.is_geog(py));
            Ok(())
        })?;
    }

    #[test]
    fn wrapping_preserves_address(x in -180.0..180.0f64, y in -90.0..90.0f64) {
        Python::with_gil(|py| -> Result<(), TestCaseError> {
            let point = Box::new(Point::new(x, y));
            let before = point.as_ref() as *const Point as *const ();
            let obj = PyObjectGeography::from_geog(py, point).unwrap();
            let geog: &dyn Geography = obj.as_geog(py).unwrap();
            prop_assert_eq!(geog as *const dyn Geography as *const (), before);
            Ok(())
        })?;
    }
}
