//! Native Geography object model.
//!
//! Geographies are immutable. Each concrete kind implements the [`Geography`]
//! capability trait; Python only ever sees them through the frozen
//! [`PyGeography`] class, which owns a `Box<dyn Geography>`.

use std::any::Any;
use std::fmt;

use pyo3::prelude::*;

/// Geography kind, exposed to Python as `spherely.GeographyType`.
#[pyclass(eq, eq_int, module = "spherely")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeographyType {
    #[pyo3(name = "NONE")]
    None = -1,
    #[pyo3(name = "POINT")]
    Point = 0,
    #[pyo3(name = "LINESTRING")]
    LineString = 1,
    #[pyo3(name = "POLYGON")]
    Polygon = 2,
}

/// Capability set shared by every native geography kind.
pub trait Geography: fmt::Debug + Send + Sync + 'static {
    fn geog_type(&self) -> GeographyType;

    /// Topological dimension: 0 for points, 1 for lines, 2 for areas.
    fn dimension(&self) -> i32;

    fn num_points(&self) -> usize;

    /// Escape hatch for kind-specific accessors.
    fn as_any(&self) -> &dyn Any;
}

/// A point in longitude / latitude degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl Geography for Point {
    fn geog_type(&self) -> GeographyType {
        GeographyType::Point
    }

    fn dimension(&self) -> i32 {
        0
    }

    fn num_points(&self) -> usize {
        1
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    vertices: Vec<Point>,
}

impl LineString {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
}

impl Geography for LineString {
    fn geog_type(&self) -> GeographyType {
        GeographyType::LineString
    }

    fn dimension(&self) -> i32 {
        1
    }

    fn num_points(&self) -> usize {
        self.vertices.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single-shell polygon. The shell is stored without the closing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shell: Vec<Point>,
}

impl Polygon {
    pub fn new(mut shell: Vec<Point>) -> Self {
        if shell.len() > 1 && shell.first() == shell.last() {
            shell.pop();
        }
        Self { shell }
    }

    pub fn shell(&self) -> &[Point] {
        &self.shell
    }
}

impl Geography for Polygon {
    fn geog_type(&self) -> GeographyType {
        GeographyType::Polygon
    }

    fn dimension(&self) -> i32 {
        2
    }

    fn num_points(&self) -> usize {
        self.shell.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Python-side `Geography` object.
///
/// Frozen so that a borrowed `&PyGeography` can be handed out straight from
/// a `Py<PyAny>` without touching a borrow flag or the reference count.
#[pyclass(frozen, name = "Geography", module = "spherely")]
pub struct PyGeography {
    inner: Box<dyn Geography>,
}

impl PyGeography {
    pub fn new(inner: Box<dyn Geography>) -> Self {
        Self { inner }
    }

    pub fn geog(&self) -> &dyn Geography {
        self.inner.as_ref()
    }
}

#[pymethods]
impl PyGeography {
    #[getter(type_id)]
    fn geog_type_id(&self) -> GeographyType {
        self.inner.geog_type()
    }

    #[getter]
    fn dimensions(&self) -> i32 {
        self.inner.dimension()
    }

    #[getter]
    fn num_points(&self) -> usize {
        self.inner.num_points()
    }

    fn __repr__(&self) -> String {
        match self.inner.geog_type() {
            GeographyType::Point => match self.inner.as_any().downcast_ref::<Point>() {
                Some(p) => format!("POINT ({} {})", p.x(), p.y()),
                None => "POINT".to_string(),
            },
            GeographyType::LineString => match self.inner.as_any().downcast_ref::<LineString>() {
                Some(line) => format!("LINESTRING ({})", coords(line.vertices())),
                None => "LINESTRING".to_string(),
            },
            GeographyType::Polygon => match self.inner.as_any().downcast_ref::<Polygon>() {
                Some(poly) => {
                    let shell = poly.shell();
                    // WKT rings are closed.
                    let closing = shell.first().into_iter().copied();
                    let ring: Vec<Point> = shell.iter().copied().chain(closing).collect();
                    format!("POLYGON (({}))", coords(&ring))
                }
                None => "POLYGON".to_string(),
            },
            GeographyType::None => "GEOGRAPHY EMPTY".to_string(),
        }
    }
}

fn coords(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(", ")
}
