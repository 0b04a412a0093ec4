//! Error taxonomy for the Geography bridge.
//!
//! Every failure the bridge can produce is a [`BridgeError`]. Functions
//! exposed to Python return `PyResult` and rely on the `From` impl below, so
//! `?` converts a bridge failure into the matching Python exception:
//!
//! - [`BridgeError::NotAGeography`] → `ValueError` (recoverable, per element)
//! - [`BridgeError::WrongArgumentType`] → `TypeError`
//! - [`BridgeError::Shape`] → `ValueError`
//! - [`BridgeError::UnsupportedBufferFormat`] → `RuntimeError` (fatal)
//! - [`BridgeError::NumpyUnavailable`] → `ImportError` (fatal)

use pyo3::exceptions::{PyImportError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::PyErr;

/// Result alias used by the non-Python-facing helpers.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// A generic reference does not point to a `Geography` object.
    #[error("not a Geography object")]
    NotAGeography,

    /// An argument could not be forced into the element kind a vectorized
    /// function expects.
    #[error("wrong argument type: {0}")]
    WrongArgumentType(String),

    /// Argument arrays cannot be broadcast together.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// NumPy's descriptor registry has no entry for the object type code.
    #[error("unsupported buffer format")]
    UnsupportedBufferFormat,

    /// NumPy could not be imported when the dtype was first needed.
    #[error("numpy is not available: {0}")]
    NumpyUnavailable(String),
}

impl BridgeError {
    /// Whether the failure leaves the runtime unusable for the bridge.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::UnsupportedBufferFormat | BridgeError::NumpyUnavailable(_)
        )
    }
}

impl From<BridgeError> for PyErr {
    fn from(err: BridgeError) -> PyErr {
        let msg = err.to_string();
        match err {
            BridgeError::NotAGeography | BridgeError::Shape(_) => PyValueError::new_err(msg),
            BridgeError::WrongArgumentType(_) => PyTypeError::new_err(msg),
            BridgeError::UnsupportedBufferFormat => PyRuntimeError::new_err(msg),
            BridgeError::NumpyUnavailable(_) => PyImportError::new_err(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::prelude::*;

    #[test]
    fn not_a_geography_is_value_error() {
        Python::with_gil(|py| {
            let err: PyErr = BridgeError::NotAGeography.into();
            assert!(err.is_instance_of::<PyValueError>(py));
            assert_eq!(err.value(py).to_string(), "not a Geography object");
        });
    }

    #[test]
    fn wrong_argument_type_is_type_error() {
        Python::with_gil(|py| {
            let err: PyErr = BridgeError::WrongArgumentType("expected float".into()).into();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }

    #[test]
    fn unsupported_buffer_format_is_fatal_runtime_error() {
        assert!(BridgeError::UnsupportedBufferFormat.is_fatal());
        assert!(!BridgeError::NotAGeography.is_fatal());
        Python::with_gil(|py| {
            let err: PyErr = BridgeError::UnsupportedBufferFormat.into();
            assert!(err.is_instance_of::<PyRuntimeError>(py));
            assert_eq!(err.value(py).to_string(), "unsupported buffer format");
        });
    }
}
