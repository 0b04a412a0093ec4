//! Conversion helpers shared by the vectorized functions.

use numpy::{Element, PyArrayDyn};
use pyo3::prelude::*;

use crate::error::BridgeError;

// ==================== Python Error Formatting ====================

/// Convert a `PyErr` into a human-readable error string,
/// including traceback if available.
pub fn pyerr_to_string(py: Python<'_>, err: PyErr) -> String {
    let msg = format!("{err}");
    if let Some(tb) = err.traceback(py) {
        if let Ok(formatted) = tb.format() {
            return format!("{formatted}{msg}");
        }
    }
    msg
}

// ==================== Array Coercion ====================

/// Force any array-like into an array of `T` elements via `numpy.asarray`.
///
/// Arrays that already have the right dtype are returned as-is (no copy).
/// Scalars become 0-d arrays. A value NumPy refuses to convert is reported as
/// a `WrongArgumentType` error.
pub fn as_array_of<'py, T: Element>(
    obj: &Bound<'py, PyAny>,
) -> Result<Bound<'py, PyArrayDyn<T>>, BridgeError> {
    let py = obj.py();
    let numpy = py
        .import("numpy")
        .map_err(|e| BridgeError::NumpyUnavailable(e.to_string()))?;
    let array = numpy
        .call_method1("asarray", (obj, T::get_dtype(py)))
        .map_err(|e| BridgeError::WrongArgumentType(pyerr_to_string(py, e)))?;
    array
        .downcast_into::<PyArrayDyn<T>>()
        .map_err(|e| BridgeError::WrongArgumentType(e.to_string()))
}
