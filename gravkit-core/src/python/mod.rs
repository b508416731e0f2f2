//! Python bindings
//!
//! Exposed as `gravkit._lib.core`. Arrays cross the boundary as numpy arrays
//! and coefficient sets are returned as dictionaries with `clm`, `slm`, `l`
//! and `m` entries.

use crate::errors::GravError;
use crate::harmonics::Harmonics;
use crate::love::LoveNumbers;
use crate::parameters::EarthParameters;
use crate::FloatValue;
use numpy::{IntoPyArray, PyReadonlyArray1};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

mod loads;
mod synthesis;

pub use loads::{gen_point_load, gen_spherical_cap, gen_spherical_cap_from_config};
pub use synthesis::{
    clenshaw_summation, legendre_polynomials, plm_colombo, plm_colombo_points, read_love_numbers,
};

impl From<GravError> for PyErr {
    fn from(err: GravError) -> PyErr {
        match err {
            GravError::Io(e) => PyIOError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// `(hl, kl, ll)` arrays as passed from Python
pub(crate) type PyLoveTuple<'py> = (
    PyReadonlyArray1<'py, FloatValue>,
    PyReadonlyArray1<'py, FloatValue>,
    PyReadonlyArray1<'py, FloatValue>,
);

/// Love numbers from a Python tuple, or a rigid Earth when absent
pub(crate) fn love_or_rigid(love: Option<PyLoveTuple<'_>>, lmax: usize) -> PyResult<LoveNumbers> {
    match love {
        Some((hl, kl, ll)) => Ok(LoveNumbers::new(
            hl.as_array().to_owned(),
            kl.as_array().to_owned(),
            ll.as_array().to_owned(),
        )?),
        None => Ok(LoveNumbers::zeros(lmax)),
    }
}

/// Earth parameters from an optional dict, missing keys take the defaults
pub(crate) fn earth_or_default(earth: Option<Bound<'_, PyAny>>) -> PyResult<EarthParameters> {
    match earth {
        Some(earth) => pythonize::depythonize_bound::<EarthParameters>(earth)
            .map_err(|e| PyValueError::new_err(format!("Invalid Earth parameters: {}", e))),
        None => Ok(EarthParameters::default()),
    }
}

pub(crate) fn harmonics_to_dict(py: Python<'_>, ylms: Harmonics) -> PyResult<Bound<'_, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("l", ylms.degrees().mapv(|l| l as i64).into_pyarray_bound(py))?;
    dict.set_item("m", ylms.orders().mapv(|m| m as i64).into_pyarray_bound(py))?;
    dict.set_item("clm", ylms.clm.into_pyarray_bound(py))?;
    dict.set_item("slm", ylms.slm.into_pyarray_bound(py))?;
    Ok(dict)
}

/// Default Earth parameters as a dict
#[pyfunction]
pub fn default_earth_parameters(py: Python<'_>) -> PyResult<PyObject> {
    pythonize::pythonize(py, &EarthParameters::default())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(gen_spherical_cap, m)?)?;
    m.add_function(wrap_pyfunction!(gen_spherical_cap_from_config, m)?)?;
    m.add_function(wrap_pyfunction!(gen_point_load, m)?)?;
    m.add_function(wrap_pyfunction!(plm_colombo, m)?)?;
    m.add_function(wrap_pyfunction!(plm_colombo_points, m)?)?;
    m.add_function(wrap_pyfunction!(legendre_polynomials, m)?)?;
    m.add_function(wrap_pyfunction!(read_love_numbers, m)?)?;
    m.add_function(wrap_pyfunction!(clenshaw_summation, m)?)?;
    m.add_function(wrap_pyfunction!(default_earth_parameters, m)?)?;
    Ok(())
}
