//! Spherical cap loads
//!
//! Computes the gravitational spherical harmonic coefficients of a uniform
//! circular load, such as a drained lake or an ice cap, centred at a given
//! longitude and latitude.
//!
//! # What This Computes
//!
//! An axisymmetric top-hat of angular radius $\alpha$ around the pole expands
//! into Legendre polynomials with coefficients ($x = \cos\alpha$)
//!
//! $$f_0 = \frac{1 - x}{2}, \qquad f_l = \frac{P_{l-1}(x) - P_{l+1}(x)}{2}$$
//!
//! The addition theorem rotates the cap to its centre
//! $(\theta_0, \phi_0)$, and the load Love numbers turn the surface density
//! $\sigma$ into the elastic response of the potential:
//!
//! $$C_{lm} = \frac{3 \rho_w (1 + k_l)}{(2l + 1) \rho_e R} \, h \,
//!     \frac{f_l}{2l + 1} \bar{P}_{lm}(\cos\theta_0) \cos m\phi_0$$
//!
//! with $S_{lm}$ using $\sin m\phi_0$ and $h$ the equivalent water thickness.
//!
//! # Examples
//!
//! ```rust
//! use gravkit_core::love::LoveNumbers;
//! use gravkit_core::spherical_cap::{gen_spherical_cap, CapSize, SphericalCapOptions};
//!
//! let options = SphericalCapOptions::new(60, CapSize::Degrees(1.0), LoveNumbers::zeros(60));
//! let ylms = gen_spherical_cap(10.0, -45.0, 70.0, &options).unwrap();
//! assert_eq!(ylms.clm.dim(), (61, 61));
//! assert!(ylms.clm[[0, 0]] > 0.0);
//! ```

use crate::errors::{GravError, GravResult};
use crate::harmonics::{check_truncation, Harmonics};
use crate::legendre::{legendre_polynomials, plm_colombo};
use crate::love::LoveNumbers;
use crate::parameters::EarthParameters;
use crate::units::{DegreeFactors, LoadUnits};
use crate::FloatValue;
use log::debug;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Size of a spherical cap
///
/// Exactly one description determines the angular extent of the cap.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapSize {
    /// Angular radius in degrees
    Degrees(FloatValue),
    /// Radius along the surface in kilometres
    Kilometers(FloatValue),
    /// Surface area in square kilometres
    ///
    /// Converted to the radius of a planar disc of equal area,
    /// $r = \sqrt{A / \pi}$.
    Area(FloatValue),
}

impl CapSize {
    /// Build a cap size from optional, mutually exclusive descriptions
    ///
    /// Exactly one of the three may be given.
    pub fn from_options(
        radius_degrees: Option<FloatValue>,
        radius_km: Option<FloatValue>,
        area_km2: Option<FloatValue>,
    ) -> GravResult<Self> {
        let given: Vec<(&str, CapSize)> = [
            radius_degrees.map(|v| ("radius in degrees", CapSize::Degrees(v))),
            radius_km.map(|v| ("radius in km", CapSize::Kilometers(v))),
            area_km2.map(|v| ("area", CapSize::Area(v))),
        ]
        .into_iter()
        .flatten()
        .collect();

        match given.as_slice() {
            [] => Err(GravError::MissingCapSize),
            [(_, size)] => Ok(*size),
            many => Err(GravError::ConflictingCapSize(
                many.iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }

    fn value(&self) -> FloatValue {
        match self {
            CapSize::Degrees(v) | CapSize::Kilometers(v) | CapSize::Area(v) => *v,
        }
    }

    /// Angular radius of the cap in radians
    ///
    /// The value must be positive and finite, and the resulting angle may
    /// not exceed $\pi$ (a cap covering the whole sphere).
    pub fn angular_radius(&self, earth: &EarthParameters) -> GravResult<FloatValue> {
        let value = self.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(GravError::InvalidCapSize(format!(
                "{:?} must be positive and finite",
                self
            )));
        }

        let rad_km = earth.average_radius_km();
        let alpha = match self {
            CapSize::Degrees(degrees) => degrees.to_radians(),
            CapSize::Kilometers(km) => km / rad_km,
            CapSize::Area(area) => (area / PI).sqrt() / rad_km,
        };

        // Allow for rounding in the degree conversion of a full-sphere cap
        if alpha > PI * (1.0 + 1e-12) {
            return Err(GravError::InvalidCapSize(format!(
                "{:?} gives an angular radius of {:.3} degrees, above 180",
                self,
                alpha.to_degrees()
            )));
        }
        Ok(alpha.min(PI))
    }
}

/// Surface area (cm^2) of a spherical cap of angular radius `alpha`
pub fn cap_area(alpha: FloatValue, earth: &EarthParameters) -> FloatValue {
    let rad_e = earth.average_radius();
    2.0 * PI * rad_e.powi(2) * one_minus_cos(alpha)
}

// 1 - cos(alpha) without cancellation for small caps
fn one_minus_cos(alpha: FloatValue) -> FloatValue {
    2.0 * (alpha / 2.0).sin().powi(2)
}

/// Legendre expansion coefficients $f_l$ of a unit cap centred on the pole
///
/// The cap function equals one for colatitudes below `alpha` and zero
/// elsewhere: $\sum_l f_l P_l(\cos\theta)$.
pub fn cap_legendre_coefficients(lmax: usize, alpha: FloatValue) -> GravResult<Array1<FloatValue>> {
    let x = alpha.cos();
    let pl = legendre_polynomials(lmax + 1, x)?;
    let mut fl = Array1::zeros(lmax + 1);
    fl[0] = one_minus_cos(alpha) / 2.0;
    for l in 1..=lmax {
        fl[l] = (pl[l - 1] - pl[l + 1]) / 2.0;
    }
    Ok(fl)
}

/// Options for [`gen_spherical_cap`]
#[derive(Debug, Clone)]
pub struct SphericalCapOptions {
    /// Upper bound of spherical harmonic degrees
    pub lmax: usize,
    /// Upper bound of spherical harmonic orders (defaults to `lmax`)
    pub mmax: Option<usize>,
    /// Size of the cap
    pub cap: CapSize,
    /// Units of the load magnitude
    pub units: LoadUnits,
    /// Fully-normalized Legendre functions at the cap centre, indexed `[l, m]`
    ///
    /// Computed from the centre latitude when absent.
    pub plm: Option<Array2<FloatValue>>,
    /// Load Love numbers up to at least `lmax`
    pub love: LoveNumbers,
    /// Earth model
    pub earth: EarthParameters,
}

impl SphericalCapOptions {
    /// Options with cm w.e. units, `mmax = lmax` and the default Earth model
    pub fn new(lmax: usize, cap: CapSize, love: LoveNumbers) -> Self {
        Self {
            lmax,
            mmax: None,
            cap,
            units: LoadUnits::default(),
            plm: None,
            love,
            earth: EarthParameters::default(),
        }
    }

    pub fn with_mmax(mut self, mmax: usize) -> Self {
        self.mmax = Some(mmax);
        self
    }

    pub fn with_units(mut self, units: LoadUnits) -> Self {
        self.units = units;
        self
    }

    pub fn with_plm(mut self, plm: Array2<FloatValue>) -> Self {
        self.plm = Some(plm);
        self
    }

    pub fn with_earth(mut self, earth: EarthParameters) -> Self {
        self.earth = earth;
        self
    }
}

/// Validate a longitude/latitude pair in degrees and return
/// (colatitude, longitude) in radians
pub(crate) fn colatitude_longitude(
    lon: FloatValue,
    lat: FloatValue,
) -> GravResult<(FloatValue, FloatValue)> {
    if !lon.is_finite() {
        return Err(GravError::InvalidCoordinate(format!(
            "longitude must be finite, got {}",
            lon
        )));
    }
    if !lat.is_finite() || lat.abs() > 90.0 {
        return Err(GravError::InvalidCoordinate(format!(
            "latitude must lie in [-90, 90], got {}",
            lat
        )));
    }
    Ok(((90.0 - lat).to_radians(), lon.to_radians()))
}

/// Spherical harmonic coefficients of a uniform spherical cap load
///
/// # Arguments
///
/// * `data` - Load magnitude in `options.units`
/// * `lon` - Longitude of the cap centre (degrees)
/// * `lat` - Latitude of the cap centre (degrees)
/// * `options` - Truncation, cap size, Legendre functions, Love numbers
///
/// # Returns
///
/// Coefficients with shape `(lmax + 1, mmax + 1)`.
///
/// # Errors
///
/// * `InvalidTruncation` - `mmax` exceeds `lmax`
/// * `InvalidCapSize` - non-positive radius or a cap larger than the sphere
/// * `LegendreShape` - supplied Legendre table smaller than the truncation
/// * `LoveNumbers` - Love numbers stop short of `lmax`
/// * `InvalidCoordinate` - non-finite data or coordinates out of range
pub fn gen_spherical_cap(
    data: FloatValue,
    lon: FloatValue,
    lat: FloatValue,
    options: &SphericalCapOptions,
) -> GravResult<Harmonics> {
    let lmax = options.lmax;
    let mmax = options.mmax.unwrap_or(lmax);
    check_truncation(lmax, mmax)?;
    if !data.is_finite() {
        return Err(GravError::InvalidCoordinate(format!(
            "load magnitude must be finite, got {}",
            data
        )));
    }
    let (theta, phi) = colatitude_longitude(lon, lat)?;

    let earth = &options.earth;
    let alpha = options.cap.angular_radius(earth)?;
    let area = cap_area(alpha, earth);
    let thickness = options.units.water_thickness_cm(data, area, earth);
    debug!(
        "Spherical cap at ({}, {}): radius {:.4} degrees, area {:.6e} cm^2, {} {} = {:.6e} cm w.e.",
        lon,
        lat,
        alpha.to_degrees(),
        area,
        data,
        options.units,
        thickness
    );

    let factors = DegreeFactors::spatial(lmax, &options.love, earth)?;
    let fl = cap_legendre_coefficients(lmax, alpha)?;

    let computed;
    let plm = match &options.plm {
        Some(plm) => {
            let (rows, cols) = plm.dim();
            if rows < lmax + 1 || cols < mmax + 1 {
                return Err(GravError::LegendreShape {
                    rows,
                    cols,
                    needed_rows: lmax + 1,
                    needed_cols: mmax + 1,
                });
            }
            plm
        }
        None => {
            computed = plm_colombo(lmax, theta.cos())?.0;
            &computed
        }
    };

    let mut ylms = Harmonics::zeros(lmax, mmax)?;
    for l in 0..=lmax {
        // 4 pi undoes the analysis normalization of the spatial factor
        let dfactor =
            4.0 * PI * factors.cmwe[l] * thickness * fl[l] / (2.0 * l as FloatValue + 1.0);
        for m in 0..=l.min(mmax) {
            let mphi = m as FloatValue * phi;
            ylms.clm[[l, m]] = dfactor * plm[[l, m]] * mphi.cos();
            ylms.slm[[l, m]] = dfactor * plm[[l, m]] * mphi.sin();
        }
    }

    Ok(ylms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cap_size_from_options() {
        assert_eq!(
            CapSize::from_options(Some(1.5), None, None).unwrap(),
            CapSize::Degrees(1.5)
        );
        assert_eq!(
            CapSize::from_options(None, Some(100.0), None).unwrap(),
            CapSize::Kilometers(100.0)
        );
        assert_eq!(
            CapSize::from_options(None, None, Some(1.0e4)).unwrap(),
            CapSize::Area(1.0e4)
        );
    }

    #[test]
    fn test_cap_size_missing() {
        assert!(matches!(
            CapSize::from_options(None, None, None),
            Err(GravError::MissingCapSize)
        ));
    }

    #[test]
    fn test_cap_size_conflicting() {
        match CapSize::from_options(Some(1.0), None, Some(10.0)) {
            Err(GravError::ConflictingCapSize(names)) => {
                assert_eq!(names, "radius in degrees, area");
            }
            other => panic!("Expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_angular_radius_conversions() {
        let earth = EarthParameters::default();
        let rad_km = earth.average_radius_km();

        let from_degrees = CapSize::Degrees(2.0).angular_radius(&earth).unwrap();
        assert_relative_eq!(from_degrees, 2.0_f64.to_radians());

        let from_km = CapSize::Kilometers(rad_km * 0.1).angular_radius(&earth).unwrap();
        assert_relative_eq!(from_km, 0.1);

        let radius = 0.05 * rad_km;
        let from_area = CapSize::Area(PI * radius * radius)
            .angular_radius(&earth)
            .unwrap();
        assert_relative_eq!(from_area, 0.05, max_relative = 1e-12);
    }

    #[test]
    fn test_angular_radius_rejects_invalid() {
        let earth = EarthParameters::default();
        assert!(CapSize::Degrees(0.0).angular_radius(&earth).is_err());
        assert!(CapSize::Kilometers(-5.0).angular_radius(&earth).is_err());
        assert!(CapSize::Area(FloatValue::NAN).angular_radius(&earth).is_err());
        assert!(CapSize::Degrees(181.0).angular_radius(&earth).is_err());
        // Half the circumference is still a valid (full-sphere) cap
        let half = PI * earth.average_radius_km();
        assert_relative_eq!(
            CapSize::Kilometers(half).angular_radius(&earth).unwrap(),
            PI
        );
    }

    #[test]
    fn test_cap_legendre_coefficients_sum_to_one_inside() {
        // Partial sums at the pole telescope to 1 - (P_L + P_{L+1}) / 2
        let alpha = 0.3;
        let lmax = 50;
        let fl = cap_legendre_coefficients(lmax, alpha).unwrap();
        let pl = legendre_polynomials(lmax + 1, alpha.cos()).unwrap();
        let expected = 1.0 - (pl[lmax] + pl[lmax + 1]) / 2.0;
        assert_relative_eq!(fl.sum(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_cap_area_full_sphere() {
        let earth = EarthParameters::default();
        let rad_e = earth.average_radius();
        assert_relative_eq!(cap_area(PI, &earth), 4.0 * PI * rad_e * rad_e);
    }

    #[test]
    fn test_truncation_errors() {
        let options = SphericalCapOptions::new(10, CapSize::Degrees(1.0), LoveNumbers::zeros(10))
            .with_mmax(11);
        assert!(matches!(
            gen_spherical_cap(1.0, 0.0, 0.0, &options),
            Err(GravError::InvalidTruncation { lmax: 10, mmax: 11 })
        ));
    }

    #[test]
    fn test_short_love_numbers() {
        let options = SphericalCapOptions::new(10, CapSize::Degrees(1.0), LoveNumbers::zeros(5));
        assert!(matches!(
            gen_spherical_cap(1.0, 0.0, 0.0, &options),
            Err(GravError::LoveNumbers(_))
        ));
    }

    #[test]
    fn test_small_legendre_table() {
        let options = SphericalCapOptions::new(10, CapSize::Degrees(1.0), LoveNumbers::zeros(10))
            .with_plm(Array2::zeros((8, 11)));
        match gen_spherical_cap(1.0, 0.0, 0.0, &options) {
            Err(GravError::LegendreShape {
                rows: 8,
                needed_rows: 11,
                ..
            }) => {}
            other => panic!("Expected Legendre shape error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordinates() {
        let options = SphericalCapOptions::new(4, CapSize::Degrees(1.0), LoveNumbers::zeros(4));
        assert!(gen_spherical_cap(1.0, 0.0, 91.0, &options).is_err());
        assert!(gen_spherical_cap(1.0, FloatValue::INFINITY, 0.0, &options).is_err());
        assert!(gen_spherical_cap(FloatValue::NAN, 0.0, 0.0, &options).is_err());
    }

    #[test]
    fn test_supplied_legendre_matches_computed() {
        let lat: FloatValue = 35.0;
        let theta = (90.0 - lat).to_radians();
        let (plm, _) = plm_colombo(30, theta.cos()).unwrap();
        let base = SphericalCapOptions::new(20, CapSize::Kilometers(250.0), LoveNumbers::zeros(20));
        let supplied = base.clone().with_plm(plm);

        let a = gen_spherical_cap(3.0, 120.0, lat, &base).unwrap();
        let b = gen_spherical_cap(3.0, 120.0, lat, &supplied).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_truncation_and_upper_triangle() {
        let options = SphericalCapOptions::new(12, CapSize::Degrees(5.0), LoveNumbers::zeros(12))
            .with_mmax(4);
        let ylms = gen_spherical_cap(1.0, 30.0, -20.0, &options).unwrap();
        assert_eq!(ylms.clm.dim(), (13, 5));
        assert_eq!(ylms.orders().to_vec(), vec![0, 1, 2, 3, 4]);
        for l in 0..4 {
            for m in (l + 1)..=4 {
                assert_eq!(ylms.clm[[l, m]], 0.0);
                assert_eq!(ylms.slm[[l, m]], 0.0);
            }
        }
        // No sine terms for order zero
        for l in 0..=12 {
            assert_eq!(ylms.slm[[l, 0]], 0.0);
        }
    }

    #[test]
    fn test_linear_in_magnitude() {
        let options = SphericalCapOptions::new(15, CapSize::Degrees(3.0), LoveNumbers::zeros(15));
        let one = gen_spherical_cap(1.0, 10.0, 10.0, &options).unwrap();
        let five = gen_spherical_cap(5.0, 10.0, 10.0, &options).unwrap();
        for (a, b) in one.clm.iter().zip(five.clm.iter()) {
            assert_relative_eq!(5.0 * a, *b, max_relative = 1e-12);
        }
    }
}
