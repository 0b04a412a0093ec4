//! `PyObjectGeography`: a Python object that maybe points to a Geography.
//!
//! This is the element type of vectorized functions operating on
//! `numpy.object` arrays. The array stores references to Python objects, not
//! the objects themselves, so a `#[repr(transparent)]` wrapper around
//! `Py<PyAny>` has exactly the layout NumPy uses for object elements.
//!
//! There is no implicit conversion to or from Geography values. Use:
//!
//! - [`PyObjectGeography::as_geog`] to borrow the native object (checked)
//! - [`PyObjectGeography::from_geog`] to hand a new native object to Python
//! - [`PyObjectGeography::is_geog`] for a non-raising type test

use numpy::{Element, PyArrayDescr};
use pyo3::prelude::*;

use crate::error::BridgeError;
use crate::geography::{Geography, PyGeography};
use crate::registry;

#[repr(transparent)]
#[derive(Debug)]
pub struct PyObjectGeography(Py<PyAny>);

impl PyObjectGeography {
    /// Python -> native conversion.
    ///
    /// Dynamic type check against the `Geography` class, no copy. The returned
    /// reference borrows `self`, so it cannot outlive the Python reference it
    /// came from. Fails with `NotAGeography` (a `ValueError` on the Python
    /// side) and leaves the object untouched otherwise.
    pub fn as_geog<'a>(&'a self, py: Python<'a>) -> Result<&'a dyn Geography, BridgeError> {
        let geog = self
            .0
            .bind(py)
            .downcast::<PyGeography>()
            .map_err(|_| BridgeError::NotAGeography)?;
        Ok(geog.get().geog())
    }

    /// Native -> Python conversion.
    ///
    /// Takes the geography by value: after the call Python owns it and the
    /// caller has nothing left to drop or reuse. The box is moved, not copied,
    /// so the native object keeps its address. The only failure is Python
    /// failing to allocate the wrapper, in which case the geography is
    /// dropped and no reference is created.
    pub fn from_geog<T: Geography>(py: Python<'_>, geog: Box<T>) -> PyResult<Self> {
        let obj = Py::new(py, PyGeography::new(geog))?;
        Ok(Self(obj.into_any()))
    }

    /// Whether this object is a Geography. Never raises.
    pub fn is_geog(&self, py: Python<'_>) -> bool {
        self.as_geog(py).is_ok()
    }

    pub fn as_py_object(&self) -> &Py<PyAny> {
        &self.0
    }

    pub fn into_inner(self) -> Py<PyAny> {
        self.0
    }
}

impl From<Py<PyAny>> for PyObjectGeography {
    fn from(obj: Py<PyAny>) -> Self {
        Self(obj)
    }
}

impl<'py> From<Bound<'py, PyAny>> for PyObjectGeography {
    fn from(obj: Bound<'py, PyAny>) -> Self {
        Self(obj.unbind())
    }
}

// Pass-through: the wrapper already is a Python object.
impl<'py> IntoPyObject<'py> for PyObjectGeography {
    type Target = PyAny;
    type Output = Bound<'py, PyAny>;
    type Error = std::convert::Infallible;

    fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
        Ok(self.0.into_bound(py))
    }
}

// Safety: `PyObjectGeography` is a transparent `Py<PyAny>`, i.e. a single
// `PyObject*`, which is exactly the storage of an `NPY_OBJECT` element. NumPy
// owns one reference per element, as `Py<PyAny>` does.
unsafe impl Element for PyObjectGeography {
    const IS_COPY: bool = false;

    fn get_dtype(py: Python<'_>) -> Bound<'_, PyArrayDescr> {
        registry::object_dtype(py)
    }

    fn clone_ref(&self, py: Python<'_>) -> Self {
        Self(self.0.clone_ref(py))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::{GeographyType, LineString, Point};
    use numpy::PyArrayDescrMethods;
    use pyo3::exceptions::PyValueError;

    fn addr<T: ?Sized>(r: &T) -> *const () {
        r as *const T as *const ()
    }

    #[test]
    fn borrow_returns_wrapped_object_address() {
        Python::with_gil(|py| {
            let point = Box::new(Point::new(1.0, 2.0));
            let before = addr(point.as_ref());

            let obj = PyObjectGeography::from_geog(py, point).unwrap();
            let refcnt = obj.as_py_object().get_refcnt(py);
            let geog = obj.as_geog(py).unwrap();

            assert_eq!(addr(geog), before);
            assert_eq!(obj.as_py_object().get_refcnt(py), refcnt);
        });
    }

    #[test]
    fn constructed_point_round_trips() {
        Python::with_gil(|py| {
            let obj = PyObjectGeography::from_geog(py, Box::new(Point::new(1.0, 2.0))).unwrap();
            assert!(obj.is_geog(py));

            let geog = obj.as_geog(py).unwrap();
            assert_eq!(geog.geog_type(), GeographyType::Point);
            let point = geog.as_any().downcast_ref::<Point>().unwrap();
            assert_eq!((point.x(), point.y()), (1.0, 2.0));
        });
    }

    #[test]
    fn any_geography_kind_can_be_wrapped() {
        Python::with_gil(|py| {
            let line = LineString::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);
            let obj = PyObjectGeography::from_geog(py, Box::new(line)).unwrap();
            let bound = obj.as_py_object().bind(py);
            assert!(bound.is_instance_of::<PyGeography>());
            assert_eq!(obj.as_geog(py).unwrap().num_points(), 2);
        });
    }

    #[test]
    fn borrow_of_integer_fails_without_side_effects() {
        Python::with_gil(|py| {
            let int = 12345i64.into_pyobject(py).unwrap().into_any().unbind();
            let refcnt = int.get_refcnt(py);
            let obj = PyObjectGeography::from(int);

            assert!(!obj.is_geog(py));
            let err = obj.as_geog(py).unwrap_err();
            assert_eq!(err, BridgeError::NotAGeography);

            let pyerr: PyErr = err.into();
            assert!(pyerr.is_instance_of::<PyValueError>(py));
            assert_eq!(pyerr.value(py).to_string(), "not a Geography object");

            assert_eq!(obj.as_py_object().get_refcnt(py), refcnt);
            assert_eq!(obj.as_py_object().extract::<i64>(py).unwrap(), 12345);
        });
    }

    #[test]
    fn none_is_not_a_geography() {
        Python::with_gil(|py| {
            let obj = PyObjectGeography::from(py.None());
            assert!(!obj.is_geog(py));
            assert!(obj.as_geog(py).is_err());
        });
    }

    #[test]
    fn into_pyobject_is_identity() {
        Python::with_gil(|py| {
            let obj = PyObjectGeography::from_geog(py, Box::new(Point::new(0.0, 0.0))).unwrap();
            let before = obj.as_py_object().as_ptr();
            let geog_addr = addr(obj.as_geog(py).unwrap());

            let bound = obj.into_pyobject(py).unwrap();
            assert_eq!(bound.as_ptr(), before);

            let back = PyObjectGeography::from(bound);
            assert_eq!(addr(back.as_geog(py).unwrap()), geog_addr);
        });
    }

    #[test]
    fn element_dtype_is_object() {
        Python::with_gil(|py| {
            let dtype = PyObjectGeography::get_dtype(py);
            assert!(dtype.is_equiv_to(&PyArrayDescr::object(py)));
        });
    }
}
