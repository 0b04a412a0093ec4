//! Process-wide dtype registry: the "object" array element descriptor.
//!
//! The descriptor is looked up once in NumPy's type-description registry by
//! type code (`NPY_OBJECT`) and cached for the rest of the process lifetime.
//! Lookups are serialized by the GIL; if two threads race on the first
//! lookup both resolve the same descriptor and the first one stored wins.
//!
//! A missing entry means the loaded NumPy cannot hold generic object
//! references at all, which is fatal for the bridge.

use std::os::raw::c_int;

use numpy::npyffi::{NPY_TYPES, PY_ARRAY_API};
use numpy::{PyArrayDescr, PyArrayDescrMethods};
use pyo3::prelude::*;
use pyo3::sync::GILOnceCell;

use crate::error::{BridgeError, BridgeResult};

/// Label reported for the generic object element kind.
pub const OBJECT_DTYPE_NAME: &str = "object";

static OBJECT_DTYPE: GILOnceCell<Py<PyArrayDescr>> = GILOnceCell::new();

/// Identifier of the array element kind used to store generic references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtypeTag {
    pub name: &'static str,
    pub num: c_int,
}

/// Resolve (at most once) and return the object dtype descriptor.
pub fn try_object_dtype(py: Python<'_>) -> BridgeResult<Bound<'_, PyArrayDescr>> {
    let descr = OBJECT_DTYPE.get_or_try_init(py, || resolve(py))?;
    Ok(descr.bind(py).clone())
}

/// Infallible variant used by the NumPy `Element` hook.
///
/// # Panics
/// If the descriptor cannot be resolved. Module initialization resolves it
/// eagerly through [`dtype_tag`], so a working module never reaches the panic.
pub fn object_dtype(py: Python<'_>) -> Bound<'_, PyArrayDescr> {
    match try_object_dtype(py) {
        Ok(descr) => descr,
        Err(err) => panic!("cannot register object dtype: {err}"),
    }
}

/// The cached tag for the object element kind.
pub fn dtype_tag(py: Python<'_>) -> BridgeResult<DtypeTag> {
    let descr = try_object_dtype(py)?;
    Ok(DtypeTag {
        name: OBJECT_DTYPE_NAME,
        num: descr.num(),
    })
}

fn resolve(py: Python<'_>) -> BridgeResult<Py<PyArrayDescr>> {
    resolve_code(py, NPY_TYPES::NPY_OBJECT as c_int)
}

/// Look up the descriptor NumPy registers for `code`.
fn resolve_code(py: Python<'_>, code: c_int) -> BridgeResult<Py<PyArrayDescr>> {
    // Import explicitly so a missing NumPy is an error instead of a panic
    // inside the C-API capsule lookup.
    py.import("numpy")
        .map_err(|e| BridgeError::NumpyUnavailable(e.to_string()))?;

    let ptr = unsafe { PY_ARRAY_API.PyArray_DescrFromType(py, code) };
    if ptr.is_null() {
        // NumPy sets a Python error alongside the null; the bridge reports
        // its own fatal condition instead.
        let cause = PyErr::take(py).map(|e| e.to_string()).unwrap_or_default();
        tracing::error!(code, %cause, "numpy has no descriptor for type code");
        return Err(BridgeError::UnsupportedBufferFormat);
    }

    // PyArray_DescrFromType returns a new reference to a dtype instance.
    let descr = unsafe {
        Bound::from_owned_ptr(py, ptr.cast::<pyo3::ffi::PyObject>())
            .downcast_into_unchecked::<PyArrayDescr>()
    };
    tracing::debug!(num = descr.num(), "resolved object dtype");
    Ok(descr.unbind())
}
