//! Vectorized functions exposed to Python.
//!
//! Every function accepts scalars, sequences or NumPy arrays. Geography
//! arguments travel as `numpy.object` arrays; see [`crate::object`].

use pyo3::prelude::*;

use crate::geography::{GeographyType, Point};
use crate::object::PyObjectGeography;
use crate::vectorize::{vectorize1, vectorize2};

/// Returns True if the object is a Geography, False otherwise.
#[pyfunction]
pub fn is_geography<'py>(py: Python<'py>, obj: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    vectorize1::<PyObjectGeography, bool, _>(py, obj, |g| Ok(g.is_geog(py)))
}

/// Returns the type ID of each geography.
///
/// Raises ValueError for anything that is not a Geography.
#[pyfunction]
pub fn get_type_id<'py>(py: Python<'py>, geography: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    vectorize1::<PyObjectGeography, i32, _>(py, geography, |g| {
        Ok(g.as_geog(py)?.geog_type() as i32)
    })
}

/// Returns the topological dimension of each geography.
#[pyfunction]
pub fn get_dimensions<'py>(
    py: Python<'py>,
    geography: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyAny>> {
    vectorize1::<PyObjectGeography, i32, _>(py, geography, |g| Ok(g.as_geog(py)?.dimension()))
}

/// Returns the x (longitude) of each point geography, NaN for other kinds.
#[pyfunction]
pub fn get_x<'py>(py: Python<'py>, geography: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    vectorize1::<PyObjectGeography, f64, _>(py, geography, |g| {
        Ok(as_point(g, py)?.map_or(f64::NAN, Point::x))
    })
}

/// Returns the y (latitude) of each point geography, NaN for other kinds.
#[pyfunction]
pub fn get_y<'py>(py: Python<'py>, geography: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    vectorize1::<PyObjectGeography, f64, _>(py, geography, |g| {
        Ok(as_point(g, py)?.map_or(f64::NAN, Point::y))
    })
}

/// Creates point geographies from broadcast longitude / latitude arrays.
#[pyfunction]
pub fn points<'py>(
    py: Python<'py>,
    longitude: &Bound<'py, PyAny>,
    latitude: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyAny>> {
    vectorize2::<f64, f64, PyObjectGeography, _>(py, longitude, latitude, |x, y| {
        PyObjectGeography::from_geog(py, Box::new(Point::new(*x, *y)))
    })
}

fn as_point<'a>(g: &'a PyObjectGeography, py: Python<'a>) -> PyResult<Option<&'a Point>> {
    let geog = g.as_geog(py)?;
    if geog.geog_type() != GeographyType::Point {
        return Ok(None);
    }
    Ok(geog.as_any().downcast_ref::<Point>())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(is_geography, m)?)?;
    m.add_function(wrap_pyfunction!(get_type_id, m)?)?;
    m.add_function(wrap_pyfunction!(get_dimensions, m)?)?;
    m.add_function(wrap_pyfunction!(get_x, m)?)?;
    m.add_function(wrap_pyfunction!(get_y, m)?)?;
    m.add_function(wrap_pyfunction!(points, m)?)?;
    Ok(())
}
