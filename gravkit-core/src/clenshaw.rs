//! Spatial synthesis at scattered points
//!
//! Evaluates a spherical harmonic expansion at arbitrary longitudes and
//! latitudes using Clenshaw summation over degree and a Horner scheme over
//! order (Tscherning and Poder, 1982; Holmes and Featherstone, 2002).
//!
//! For each order $m$ the degree sum is taken over the ratios
//! $\bar{P}_{lm} / \bar{P}_{mm}$, which obey a three-term recursion in
//! $t = \cos\theta$ only. The sectorial factors
//! $\bar{P}_{mm} \propto \sin^m\theta$ are then applied by nesting:
//!
//! $$f = T_0 + \sqrt{3} u \left(T_1 + q_2 u \left(T_2 + \dots\right)\right),
//!     \qquad q_m = \sqrt{\frac{2m + 1}{2m}}$$

use crate::errors::{GravError, GravResult};
use crate::harmonics::Harmonics;
use crate::love::LoveNumbers;
use crate::parameters::EarthParameters;
use crate::spherical_cap::colatitude_longitude;
use crate::units::{DegreeFactors, SpatialUnits};
use crate::FloatValue;
use log::debug;
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

/// Options for [`clenshaw_summation`]
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Output units
    pub units: SpatialUnits,
    /// Gaussian smoothing radius in km (0 for no smoothing)
    pub radius_km: FloatValue,
    /// Load Love numbers up to at least the degree of the harmonics
    pub love: LoveNumbers,
    /// Earth model
    pub earth: EarthParameters,
}

impl SynthesisOptions {
    pub fn new(units: SpatialUnits, love: LoveNumbers) -> Self {
        Self {
            units,
            radius_km: 0.0,
            love,
            earth: EarthParameters::default(),
        }
    }

    pub fn with_smoothing(mut self, radius_km: FloatValue) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_earth(mut self, earth: EarthParameters) -> Self {
        self.earth = earth;
        self
    }
}

/// Gaussian averaging weights as a function of degree (Jekeli, 1981)
///
/// Normalized so that $2 \pi W_0 = 1$. The recursion
///
/// $$W_{l} = -\frac{2l - 1}{b} W_{l-1} + W_{l-2}, \qquad
///     b = \frac{\ln 2}{1 - \cos(r / R)}$$
///
/// loses precision once the weights become small; from that point on the
/// weights are set to zero.
pub fn gauss_weights(
    radius_km: FloatValue,
    lmax: usize,
    earth: &EarthParameters,
) -> GravResult<Array1<FloatValue>> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GravError::Config(format!(
            "smoothing radius must be positive, got {}",
            radius_km
        )));
    }
    let b = (2.0 as FloatValue).ln() / (1.0 - (radius_km / earth.average_radius_km()).cos());
    let mut wl = Array1::zeros(lmax + 1);
    wl[0] = 1.0 / (2.0 * PI);
    if lmax == 0 {
        return Ok(wl);
    }
    let e2b = (-2.0 * b).exp();
    wl[1] = wl[0] * ((1.0 + e2b) / (1.0 - e2b) - 1.0 / b);

    for l in 2..=lmax {
        let next = (1.0 - 2.0 * l as FloatValue) / b * wl[l - 1] + wl[l - 2];
        if next < 1e-10 || next > wl[l - 1] {
            debug!("Truncating Gaussian weights at degree {}", l);
            break;
        }
        wl[l] = next;
    }
    Ok(wl)
}

// Sum over degree of c_l * coeff[l] * Pbar_lm / Pbar_mm at t = cos(theta)
fn clenshaw_order(
    t: FloatValue,
    m: usize,
    dfactor: &Array1<FloatValue>,
    coeff: ArrayView1<FloatValue>,
) -> FloatValue {
    let lmax = dfactor.len() - 1;
    let mf = m as FloatValue;
    let (mut s1, mut s2) = (0.0, 0.0);
    for l in (m..=lmax).rev() {
        let mut s = dfactor[l] * coeff[l];
        if l < lmax {
            let n = (l + 1) as FloatValue;
            let a = (((2.0 * n - 1.0) * (2.0 * n + 1.0)) / ((n - mf) * (n + mf))).sqrt();
            s += a * t * s1;
        }
        if l + 1 < lmax {
            let n = (l + 2) as FloatValue;
            let b = (((2.0 * n + 1.0) * (n + mf - 1.0) * (n - mf - 1.0))
                / ((n - mf) * (n + mf) * (2.0 * n - 3.0)))
                .sqrt();
            s -= b * s2;
        }
        s2 = s1;
        s1 = s;
    }
    s1
}

/// Spatial field of a spherical harmonic expansion at scattered points
///
/// # Arguments
///
/// * `ylms` - Fully-normalized coefficients
/// * `lon` - Longitudes of the points (degrees)
/// * `lat` - Latitudes of the points (degrees)
/// * `options` - Output units, smoothing, Love numbers and Earth model
pub fn clenshaw_summation(
    ylms: &Harmonics,
    lon: &[FloatValue],
    lat: &[FloatValue],
    options: &SynthesisOptions,
) -> GravResult<Array1<FloatValue>> {
    if lon.len() != lat.len() {
        return Err(GravError::DimensionMismatch(format!(
            "lon and lat must have equal length, got {} and {}",
            lon.len(),
            lat.len()
        )));
    }
    ylms.check_shape()?;
    let lmax = ylms.lmax();
    let mmax = ylms.mmax();

    let wl = if options.radius_km != 0.0 {
        gauss_weights(options.radius_km, lmax, &options.earth)? * (2.0 * PI)
    } else {
        Array1::ones(lmax + 1)
    };
    let factors = DegreeFactors::harmonic(lmax, &options.love, &options.earth)?;
    let dfactor = factors.get(options.units) * &wl;

    let mut spatial = Array1::zeros(lon.len());
    for (i, (&point_lon, &point_lat)) in lon.iter().zip(lat).enumerate() {
        let (theta, phi) = colatitude_longitude(point_lon, point_lat)?;
        let (t, u) = (theta.cos(), theta.sin());

        let order_sum = |m: usize| {
            let cos_part = clenshaw_order(t, m, &dfactor, ylms.clm.column(m));
            let sin_part = clenshaw_order(t, m, &dfactor, ylms.slm.column(m));
            let mphi = m as FloatValue * phi;
            cos_part * mphi.cos() + sin_part * mphi.sin()
        };

        // Horner accumulation of the sectorial factors from the top order down
        let mut s = 0.0;
        for m in (1..=mmax).rev() {
            let mf = m as FloatValue;
            let q = if m == 1 {
                (3.0 as FloatValue).sqrt()
            } else {
                ((2.0 * mf + 1.0) / (2.0 * mf)).sqrt()
            };
            s = q * u * (order_sum(m) + s);
        }
        spatial[i] = order_sum(0) + s;
    }

    Ok(spatial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legendre::plm_colombo;
    use approx::assert_relative_eq;

    // Direct evaluation of sum_lm (clm cos + slm sin) Pbar_lm
    fn direct_sum(ylms: &Harmonics, lon: FloatValue, lat: FloatValue) -> FloatValue {
        let theta = (90.0 - lat).to_radians();
        let phi = lon.to_radians();
        let (plm, _) = plm_colombo(ylms.lmax(), theta.cos()).unwrap();
        let mut total = 0.0;
        for l in 0..=ylms.lmax() {
            for m in 0..=l.min(ylms.mmax()) {
                let mphi = m as FloatValue * phi;
                let (c, s) = (ylms.clm[[l, m]], ylms.slm[[l, m]]);
                total += plm[[l, m]] * (c * mphi.cos() + s * mphi.sin());
            }
        }
        total
    }

    fn sample_harmonics(lmax: usize, mmax: usize) -> Harmonics {
        let mut ylms = Harmonics::zeros(lmax, mmax).unwrap();
        for l in 0..=lmax {
            for m in 0..=l.min(mmax) {
                let seed = (l * 31 + m * 17) as FloatValue;
                ylms.clm[[l, m]] = (seed * 0.37).sin() / (l as FloatValue + 1.0);
                if m > 0 {
                    ylms.slm[[l, m]] = (seed * 0.11).cos() / (l as FloatValue + 1.0);
                }
            }
        }
        ylms
    }

    #[test]
    fn test_matches_direct_summation() {
        let ylms = sample_harmonics(25, 25);
        let options = SynthesisOptions::new(SpatialUnits::Norm, LoveNumbers::zeros(25));
        let lon = [0.0, 37.5, -120.0, 250.0, 10.0];
        let lat = [0.0, 62.0, -33.3, 89.0, -90.0];
        let spatial = clenshaw_summation(&ylms, &lon, &lat, &options).unwrap();
        for i in 0..lon.len() {
            let expected = direct_sum(&ylms, lon[i], lat[i]);
            assert_relative_eq!(spatial[i], expected, epsilon = 1e-10, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_partial_order_truncation() {
        let ylms = sample_harmonics(12, 3);
        let options = SynthesisOptions::new(SpatialUnits::Norm, LoveNumbers::zeros(12));
        let spatial = clenshaw_summation(&ylms, &[15.0], &[-40.0], &options).unwrap();
        let expected = direct_sum(&ylms, 15.0, -40.0);
        assert_relative_eq!(spatial[0], expected, epsilon = 1e-10, max_relative = 1e-10);
    }

    #[test]
    fn test_degree_zero_only() {
        let mut ylms = Harmonics::zeros(0, 0).unwrap();
        ylms.clm[[0, 0]] = 2.5;
        let options = SynthesisOptions::new(SpatialUnits::Norm, LoveNumbers::zeros(0));
        let spatial = clenshaw_summation(&ylms, &[0.0, 100.0], &[0.0, -10.0], &options).unwrap();
        assert_eq!(spatial.to_vec(), vec![2.5, 2.5]);
    }

    #[test]
    fn test_mismatched_points() {
        let ylms = Harmonics::zeros(2, 2).unwrap();
        let options = SynthesisOptions::new(SpatialUnits::Norm, LoveNumbers::zeros(2));
        assert!(matches!(
            clenshaw_summation(&ylms, &[0.0, 1.0], &[0.0], &options),
            Err(GravError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_inconsistent_harmonics_rejected() {
        let mut ylms = Harmonics::zeros(5, 5).unwrap();
        ylms.clm = ndarray::Array2::zeros((2, 2));
        ylms.slm = ndarray::Array2::zeros((2, 2));
        let options = SynthesisOptions::new(SpatialUnits::Norm, LoveNumbers::zeros(5));
        assert!(matches!(
            clenshaw_summation(&ylms, &[0.0], &[0.0], &options),
            Err(GravError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_gauss_weights_shape() {
        let earth = EarthParameters::default();
        let wl = gauss_weights(500.0, 60, &earth).unwrap();
        assert_relative_eq!(2.0 * PI * wl[0], 1.0);
        // Monotonically decreasing towards zero
        for l in 1..=60 {
            assert!(wl[l] <= wl[l - 1]);
            assert!(wl[l] >= 0.0);
        }
        assert!(wl[60] < wl[1]);
        assert!(gauss_weights(0.0, 10, &earth).is_err());
    }

    #[test]
    fn test_smoothing_keeps_mean() {
        let mut ylms = Harmonics::zeros(10, 10).unwrap();
        ylms.clm[[0, 0]] = 1.0;
        let options =
            SynthesisOptions::new(SpatialUnits::Norm, LoveNumbers::zeros(10)).with_smoothing(300.0);
        let spatial = clenshaw_summation(&ylms, &[20.0], &[20.0], &options).unwrap();
        assert_relative_eq!(spatial[0], 1.0, max_relative = 1e-12);
    }
}
