//! Element-wise dispatch over NumPy arrays.
//!
//! A vectorized function is a plain Rust closure over one element per
//! argument. The engine coerces each Python argument into an array of the
//! argument's element kind, broadcasts the arrays against each other, calls
//! the closure once per element and assembles the results into a new array.
//! If every argument was a scalar the result is a scalar too.
//!
//! Two traits are the extension point:
//!
//! - [`VectorizeArg`]: the type may appear as a per-element argument. The
//!   closure receives `&T` pointing straight into the array buffer, so for
//!   `PyObjectGeography` no reference is copied or incref'd.
//! - [`VectorizeReturn`]: how a closure result becomes an output element.

use numpy::ndarray::{ArrayD, ArrayViewD, IxDyn};
use numpy::{Element, IntoPyArray, PyArrayDyn, PyArrayMethods, PyUntypedArrayMethods};
use pyo3::prelude::*;
use tracing::{trace, warn};

use crate::convert;
use crate::error::BridgeError;
use crate::object::PyObjectGeography;

/// An element type accepted as a vectorized argument.
pub trait VectorizeArg: Element {
    /// Coerce an arbitrary Python value into an array of `Self`.
    fn coerce<'py>(obj: &Bound<'py, PyAny>) -> Result<Bound<'py, PyArrayDyn<Self>>, BridgeError> {
        convert::as_array_of::<Self>(obj)
    }
}

/// A value a vectorized closure may return.
pub trait VectorizeReturn: Sized {
    /// Element type of the output array.
    type Element: Element;

    fn into_element(self, py: Python<'_>) -> PyResult<Self::Element>;
}

macro_rules! impl_vectorize_pod {
    ($($ty:ty),* $(,)?) => {
        $(
            impl VectorizeArg for $ty {}

            impl VectorizeReturn for $ty {
                type Element = $ty;

                fn into_element(self, _py: Python<'_>) -> PyResult<$ty> {
                    Ok(self)
                }
            }
        )*
    };
}

impl_vectorize_pod!(bool, i32, i64, f64);

// The generic argument array is already `numpy.object`; every element is
// handed over as-is and the caller uses the explicit `as_geog` cast.
impl VectorizeArg for PyObjectGeography {}

// Results are already Python references: pass through unchanged.
impl VectorizeReturn for PyObjectGeography {
    type Element = PyObjectGeography;

    fn into_element(self, _py: Python<'_>) -> PyResult<PyObjectGeography> {
        Ok(self)
    }
}

/// Apply `f` to every element of `arg`.
pub fn vectorize1<'py, A, R, F>(
    py: Python<'py>,
    arg: &Bound<'py, PyAny>,
    mut f: F,
) -> PyResult<Bound<'py, PyAny>>
where
    A: VectorizeArg,
    R: VectorizeReturn,
    F: FnMut(&A) -> PyResult<R>,
{
    let array = A::coerce(arg)?;
    let scalar = array.ndim() == 0;
    let readonly = array.try_readonly().map_err(|e| BridgeError::WrongArgumentType(e.to_string()))?;
    let input = readonly.as_array();
    trace!(shape = ?input.shape(), "vectorize1");

    let out = input
        .iter()
        .enumerate()
        .map(|(index, a)| {
            f(a)
                .and_then(|r| r.into_element(py))
                .map_err(|e| element_failed(index, e))
        })
        .collect::<PyResult<Vec<_>>>()?;
    assemble(py, input.raw_dim(), out, scalar)
}

/// Apply `f` to every pair of broadcast elements of `lhs` and `rhs`.
pub fn vectorize2<'py, A, B, R, F>(
    py: Python<'py>,
    lhs: &Bound<'py, PyAny>,
    rhs: &Bound<'py, PyAny>,
    mut f: F,
) -> PyResult<Bound<'py, PyAny>>
where
    A: VectorizeArg,
    B: VectorizeArg,
    R: VectorizeReturn,
    F: FnMut(&A, &B) -> PyResult<R>,
{
    let lhs = A::coerce(lhs)?;
    let rhs = B::coerce(rhs)?;
    let scalar = lhs.ndim() == 0 && rhs.ndim() == 0;

    let lhs = lhs.try_readonly().map_err(|e| BridgeError::WrongArgumentType(e.to_string()))?;
    let rhs = rhs.try_readonly().map_err(|e| BridgeError::WrongArgumentType(e.to_string()))?;
    let (lhs, rhs) = (lhs.as_array(), rhs.as_array());

    let shape = broadcast_shape(lhs.shape(), rhs.shape())?;
    trace!(lhs = ?lhs.shape(), rhs = ?rhs.shape(), out = ?shape, "vectorize2");
    let dim = IxDyn(&shape);
    let lhs = broadcast_to(&lhs, &dim)?;
    let rhs = broadcast_to(&rhs, &dim)?;

    let out = lhs
        .iter()
        .zip(rhs.iter())
        .enumerate()
        .map(|(index, (a, b))| {
            f(a, b)
                .and_then(|r| r.into_element(py))
                .map_err(|e| element_failed(index, e))
        })
        .collect::<PyResult<Vec<_>>>()?;
    assemble(py, dim, out, scalar)
}

fn element_failed(index: usize, err: PyErr) -> PyErr {
    warn!(index, error = %err, "vectorized element failed");
    err
}

/// NumPy broadcasting rule: align trailing axes; each pair must be equal or 1.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>, BridgeError> {
    let ndim = a.len().max(b.len());
    let mut shape = vec![0; ndim];
    for i in 0..ndim {
        let da = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let db = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        shape[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => {
                return Err(BridgeError::Shape(format!(
                    "operands could not be broadcast together with shapes {a:?} {b:?}"
                )))
            }
        };
    }
    Ok(shape)
}

fn broadcast_to<'a, T>(view: &'a ArrayViewD<'_, T>, dim: &IxDyn) -> Result<ArrayViewD<'a, T>, BridgeError> {
    view.broadcast(dim.clone())
        .ok_or_else(|| BridgeError::Shape(format!("cannot broadcast {:?} to {:?}", view.shape(), dim)))
}

fn assemble<'py, E: Element>(
    py: Python<'py>,
    dim: IxDyn,
    out: Vec<E>,
    scalar: bool,
) -> PyResult<Bound<'py, PyAny>> {
    let out = ArrayD::from_shape_vec(dim, out).map_err(|e| BridgeError::Shape(e.to_string()))?;
    let array = out.into_pyarray(py);
    if scalar {
        array.call_method0("item")
    } else {
        Ok(array.into_any())
    }
}
