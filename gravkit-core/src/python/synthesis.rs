use super::{earth_or_default, love_or_rigid, PyLoveTuple};
use crate::clenshaw::SynthesisOptions;
use crate::harmonics::Harmonics;
use crate::love::{LoveNumbers, ReferenceFrame};
use crate::units::SpatialUnits;
use crate::FloatValue;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyArray3, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use std::path::PathBuf;

/// Fully-normalized associated Legendre functions and their colatitude
/// derivatives, each with shape `(lmax + 1, lmax + 1)`
#[pyfunction]
pub fn plm_colombo(
    py: Python<'_>,
    lmax: usize,
    x: FloatValue,
) -> PyResult<(Bound<'_, PyArray2<FloatValue>>, Bound<'_, PyArray2<FloatValue>>)> {
    let (plm, dplm) = crate::legendre::plm_colombo(lmax, x)?;
    Ok((plm.into_pyarray_bound(py), dplm.into_pyarray_bound(py)))
}

/// [`plm_colombo`] at an array of arguments, with shape `(lmax + 1, lmax + 1, n)`
#[pyfunction]
pub fn plm_colombo_points<'py>(
    py: Python<'py>,
    lmax: usize,
    x: PyReadonlyArray1<'py, FloatValue>,
) -> PyResult<(Bound<'py, PyArray3<FloatValue>>, Bound<'py, PyArray3<FloatValue>>)> {
    let x = x.as_array().to_vec();
    let (plm, dplm) = crate::legendre::plm_colombo_points(lmax, &x)?;
    Ok((plm.into_pyarray_bound(py), dplm.into_pyarray_bound(py)))
}

/// Unnormalized Legendre polynomials of degree `0..=lmax`
#[pyfunction]
pub fn legendre_polynomials(
    py: Python<'_>,
    lmax: usize,
    x: FloatValue,
) -> PyResult<Bound<'_, PyArray1<FloatValue>>> {
    Ok(crate::legendre::legendre_polynomials(lmax, x)?.into_pyarray_bound(py))
}

/// Read a load Love number table and return `(hl, kl, ll)`
///
/// `frame` is one of "CM", "CE", "CF" or "None".
#[pyfunction]
#[pyo3(signature = (path, lmax, frame="None"))]
pub fn read_love_numbers<'py>(
    py: Python<'py>,
    path: PathBuf,
    lmax: usize,
    frame: &str,
) -> PyResult<(
    Bound<'py, PyArray1<FloatValue>>,
    Bound<'py, PyArray1<FloatValue>>,
    Bound<'py, PyArray1<FloatValue>>,
)> {
    let frame: ReferenceFrame = frame.parse()?;
    let LoveNumbers { hl, kl, ll } = LoveNumbers::from_path(path, lmax, frame)?;
    Ok((
        hl.into_pyarray_bound(py),
        kl.into_pyarray_bound(py),
        ll.into_pyarray_bound(py),
    ))
}

/// Evaluate coefficients at scattered points
///
/// `units`: 0 normalized, 1 cm w.e., 2 mm geoid, 3 mm uplift, 4 microGal,
/// 5 Pa. `radius` is a Gaussian smoothing radius in km (0 for none).
#[pyfunction]
#[pyo3(signature = (clm, slm, lon, lat, units=0, radius=0.0, love=None, earth=None))]
#[allow(clippy::too_many_arguments)]
pub fn clenshaw_summation<'py>(
    py: Python<'py>,
    clm: PyReadonlyArray2<'py, FloatValue>,
    slm: PyReadonlyArray2<'py, FloatValue>,
    lon: PyReadonlyArray1<'py, FloatValue>,
    lat: PyReadonlyArray1<'py, FloatValue>,
    units: i64,
    radius: FloatValue,
    love: Option<PyLoveTuple<'py>>,
    earth: Option<Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<FloatValue>>> {
    let ylms = Harmonics::from_arrays(clm.as_array().to_owned(), slm.as_array().to_owned())?;
    let options = SynthesisOptions::new(
        SpatialUnits::from_selector(units)?,
        love_or_rigid(love, ylms.lmax())?,
    )
    .with_smoothing(radius)
    .with_earth(earth_or_default(earth)?);

    let lon = lon.as_array().to_vec();
    let lat = lat.as_array().to_vec();
    let spatial = crate::clenshaw::clenshaw_summation(&ylms, &lon, &lat, &options)?;
    Ok(spatial.into_pyarray_bound(py))
}
