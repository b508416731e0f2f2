//! Point mass loads
//!
//! Coefficients of a set of point masses, the limit of a spherical cap whose
//! radius shrinks at constant mass. Each mass $M_i$ at $(\theta_i, \phi_i)$
//! contributes
//!
//! $$C_{lm} = \frac{3 (1 + k_l)}{(2l + 1) 4 \pi R \rho_e} \frac{M_i}{R^2}
//!     \bar{P}_{lm}(\cos\theta_i) \cos m\phi_i$$

use crate::errors::{GravError, GravResult};
use crate::harmonics::{check_truncation, Harmonics};
use crate::legendre::plm_colombo;
use crate::love::LoveNumbers;
use crate::parameters::EarthParameters;
use crate::spherical_cap::colatitude_longitude;
use crate::units::{DegreeFactors, MassUnits};
use crate::FloatValue;
use log::debug;

/// Options for [`gen_point_load`]
#[derive(Debug, Clone)]
pub struct PointLoadOptions {
    /// Upper bound of spherical harmonic degrees
    pub lmax: usize,
    /// Upper bound of spherical harmonic orders (defaults to `lmax`)
    pub mmax: Option<usize>,
    /// Units of the point masses
    pub units: MassUnits,
    /// Load Love numbers up to at least `lmax`
    pub love: LoveNumbers,
    /// Earth model
    pub earth: EarthParameters,
}

impl PointLoadOptions {
    pub fn new(lmax: usize, love: LoveNumbers) -> Self {
        Self {
            lmax,
            mmax: None,
            units: MassUnits::default(),
            love,
            earth: EarthParameters::default(),
        }
    }

    pub fn with_mmax(mut self, mmax: usize) -> Self {
        self.mmax = Some(mmax);
        self
    }

    pub fn with_units(mut self, units: MassUnits) -> Self {
        self.units = units;
        self
    }

    pub fn with_earth(mut self, earth: EarthParameters) -> Self {
        self.earth = earth;
        self
    }
}

/// Spherical harmonic coefficients of point masses
///
/// `data`, `lon` and `lat` are parallel slices (mass, degrees, degrees).
pub fn gen_point_load(
    data: &[FloatValue],
    lon: &[FloatValue],
    lat: &[FloatValue],
    options: &PointLoadOptions,
) -> GravResult<Harmonics> {
    if data.len() != lon.len() || data.len() != lat.len() {
        return Err(GravError::DimensionMismatch(format!(
            "data, lon and lat must have equal length, got {}, {} and {}",
            data.len(),
            lon.len(),
            lat.len()
        )));
    }
    let lmax = options.lmax;
    let mmax = options.mmax.unwrap_or(lmax);
    check_truncation(lmax, mmax)?;

    let earth = &options.earth;
    let factors = DegreeFactors::spatial(lmax, &options.love, earth)?;
    // grams -> cm w.e. over the square of the Earth radius
    let scale = options.units.to_grams() / (earth.rho_water * factors.rad_e.powi(2));
    debug!("Point load expansion of {} masses to degree {}", data.len(), lmax);

    let mut ylms = Harmonics::zeros(lmax, mmax)?;
    for ((&mass, &point_lon), &point_lat) in data.iter().zip(lon).zip(lat) {
        if !mass.is_finite() {
            return Err(GravError::InvalidCoordinate(format!(
                "point mass must be finite, got {}",
                mass
            )));
        }
        let (theta, phi) = colatitude_longitude(point_lon, point_lat)?;
        let (plm, _) = plm_colombo(lmax, theta.cos())?;
        let magnitude = mass * scale;
        for l in 0..=lmax {
            let dfactor = factors.cmwe[l] * magnitude;
            for m in 0..=l.min(mmax) {
                let mphi = m as FloatValue * phi;
                ylms.clm[[l, m]] += dfactor * plm[[l, m]] * mphi.cos();
                ylms.slm[[l, m]] += dfactor * plm[[l, m]] * mphi.sin();
            }
        }
    }

    Ok(ylms)
}
