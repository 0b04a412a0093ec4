//! spherely: vectorized Geography functions over NumPy object arrays.
//!
//! This crate builds a Python extension module (`spherely`). Native
//! geographies live in Python as `spherely.Geography` objects; vectorized
//! functions receive and return them through `numpy.object` arrays:
//!
//! - [`object`]: the `PyObjectGeography` element type (borrow / wrap / probe)
//! - [`registry`]: the process-wide object dtype descriptor
//! - [`vectorize`]: element-wise dispatch with broadcasting
//! - [`functions`]: the Python-facing vectorized functions
//!
//! Set `SPHERELY_LOG=debug` to trace registration and dispatch.

pub mod convert;
pub mod error;
pub mod functions;
pub mod geography;
pub mod logging;
pub mod object;
pub mod registry;
pub mod vectorize;

use pyo3::prelude::*;

use crate::geography::{GeographyType, PyGeography};

#[pymodule]
fn spherely(m: &Bound<'_, PyModule>) -> PyResult<()> {
    logging::init(&logging::LogConfig::from_env());

    // Resolve the object dtype up front: an incompatible NumPy fails the
    // import here instead of panicking in the first vectorized call.
    let tag = registry::dtype_tag(m.py()).map_err(|err| {
        if err.is_fatal() {
            tracing::error!(%err, "numpy cannot hold Geography objects, aborting import");
        }
        PyErr::from(err)
    })?;
    tracing::debug!(name = tag.name, num = tag.num, "registered geography dtype");

    m.add_class::<PyGeography>()?;
    m.add_class::<GeographyType>()?;
    functions::register(m)?;
    Ok(())
}
