use super::{earth_or_default, harmonics_to_dict, love_or_rigid, PyLoveTuple};
use crate::parameters::SphericalCapConfig;
use crate::point_load::PointLoadOptions;
use crate::spherical_cap::{CapSize, SphericalCapOptions};
use crate::units::{LoadUnits, MassUnits};
use crate::FloatValue;
use numpy::{PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;

// Zero marks an unset cap size
fn non_zero(value: FloatValue) -> Option<FloatValue> {
    (value != 0.0).then_some(value)
}

/// Spherical harmonic coefficients of a uniform spherical cap load
///
/// Exactly one of `rad_cap` (degrees), `rad_km` or `area` (km^2) must be
/// non-zero. `units` selects the load magnitude: 1 cm w.e., 2 Gt, 3 mm w.e.
/// `love` is a `(hl, kl, ll)` tuple; without it the Earth is rigid.
///
/// Returns a dict with `clm`, `slm`, `l` and `m`.
#[pyfunction]
#[pyo3(signature = (data, lon, lat, lmax=60, mmax=None, rad_cap=0.0, rad_km=0.0, area=0.0, plm=None, love=None, units=1, earth=None))]
#[allow(clippy::too_many_arguments)]
pub fn gen_spherical_cap<'py>(
    py: Python<'py>,
    data: FloatValue,
    lon: FloatValue,
    lat: FloatValue,
    lmax: usize,
    mmax: Option<usize>,
    rad_cap: FloatValue,
    rad_km: FloatValue,
    area: FloatValue,
    plm: Option<PyReadonlyArray2<'py, FloatValue>>,
    love: Option<PyLoveTuple<'py>>,
    units: i64,
    earth: Option<Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyDict>> {
    let cap = CapSize::from_options(non_zero(rad_cap), non_zero(rad_km), non_zero(area))?;
    let mut options = SphericalCapOptions::new(lmax, cap, love_or_rigid(love, lmax)?)
        .with_units(LoadUnits::from_selector(units)?)
        .with_earth(earth_or_default(earth)?);
    if let Some(mmax) = mmax {
        options = options.with_mmax(mmax);
    }
    if let Some(plm) = plm {
        options = options.with_plm(plm.as_array().to_owned());
    }

    let ylms = crate::spherical_cap::gen_spherical_cap(data, lon, lat, &options)?;
    harmonics_to_dict(py, ylms)
}

/// Spherical cap coefficients with options read from a TOML file
#[pyfunction]
pub fn gen_spherical_cap_from_config(
    py: Python<'_>,
    path: PathBuf,
    data: FloatValue,
    lon: FloatValue,
    lat: FloatValue,
) -> PyResult<Bound<'_, PyDict>> {
    let options = SphericalCapConfig::from_path(path)?.to_options()?;
    let ylms = crate::spherical_cap::gen_spherical_cap(data, lon, lat, &options)?;
    harmonics_to_dict(py, ylms)
}

/// Spherical harmonic coefficients of point masses
///
/// `units` selects the mass units: 1 grams, 2 Gt.
#[pyfunction]
#[pyo3(signature = (data, lon, lat, lmax=60, mmax=None, love=None, units=1, earth=None))]
#[allow(clippy::too_many_arguments)]
pub fn gen_point_load<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, FloatValue>,
    lon: PyReadonlyArray1<'py, FloatValue>,
    lat: PyReadonlyArray1<'py, FloatValue>,
    lmax: usize,
    mmax: Option<usize>,
    love: Option<PyLoveTuple<'py>>,
    units: i64,
    earth: Option<Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyDict>> {
    let mut options = PointLoadOptions::new(lmax, love_or_rigid(love, lmax)?)
        .with_units(MassUnits::from_selector(units)?)
        .with_earth(earth_or_default(earth)?);
    if let Some(mmax) = mmax {
        options = options.with_mmax(mmax);
    }

    let data = data.as_array().to_vec();
    let lon = lon.as_array().to_vec();
    let lat = lat.as_array().to_vec();
    let ylms = crate::point_load::gen_point_load(&data, &lon, &lat, &options)?;
    harmonics_to_dict(py, ylms)
}
