//! Load units and degree-dependent conversion factors
//!
//! Converting between a surface mass field and normalized gravitational
//! coefficients requires a factor per spherical harmonic degree that
//! includes the load Love number $k_l$ (Wahr et al., 1998):
//!
//! $$C_{lm} = \frac{3 \rho_w (1 + k_l)}{(2l + 1) \rho_e R} \hat{\sigma}_{lm}$$
//!
//! [`DegreeFactors::spatial`] holds the factors for the forward direction
//! (spatial load to harmonics) and [`DegreeFactors::harmonic`] those for
//! synthesis (harmonics to a spatial field in one of the [`SpatialUnits`]).

use crate::errors::{GravError, GravResult};
use crate::love::LoveNumbers;
use crate::parameters::EarthParameters;
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Units of the magnitude of a spherical cap load
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadUnits {
    /// Centimetres of water equivalent thickness
    #[default]
    #[serde(alias = "cm")]
    Cmwe,
    /// Gigatonnes of total mass spread uniformly over the cap
    #[serde(alias = "gigatonnes")]
    Gt,
    /// Millimetres of water equivalent thickness (equivalently kg/m^2)
    #[serde(alias = "mm", alias = "kg/m^2")]
    Mmwe,
}

impl LoadUnits {
    /// Map an integer units selector
    ///
    /// 1: cm w.e., 2: Gt, 3: mm w.e. (kg/m^2)
    pub fn from_selector(selector: i64) -> GravResult<Self> {
        match selector {
            1 => Ok(LoadUnits::Cmwe),
            2 => Ok(LoadUnits::Gt),
            3 => Ok(LoadUnits::Mmwe),
            value => Err(GravError::InvalidUnits {
                value,
                expected: "1 (cmwe), 2 (Gt), 3 (mmwe)".to_string(),
            }),
        }
    }

    /// Equivalent water thickness (cm) of a load spread uniformly over `area_cm2`
    ///
    /// `area_cm2` is only used for total-mass units.
    pub fn water_thickness_cm(
        &self,
        magnitude: FloatValue,
        area_cm2: FloatValue,
        earth: &EarthParameters,
    ) -> FloatValue {
        match self {
            LoadUnits::Cmwe => magnitude,
            LoadUnits::Mmwe => 0.1 * magnitude,
            // 1 Gt = 1e15 g
            LoadUnits::Gt => 1.0e15 * magnitude / (area_cm2 * earth.rho_water),
        }
    }
}

impl fmt::Display for LoadUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadUnits::Cmwe => "cmwe",
            LoadUnits::Gt => "Gt",
            LoadUnits::Mmwe => "mmwe",
        };
        write!(f, "{}", name)
    }
}

/// Units of a mass point load
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnits {
    /// Grams
    #[default]
    Grams,
    /// Gigatonnes
    Gt,
}

impl MassUnits {
    /// 1: grams, 2: Gt
    pub fn from_selector(selector: i64) -> GravResult<Self> {
        match selector {
            1 => Ok(MassUnits::Grams),
            2 => Ok(MassUnits::Gt),
            value => Err(GravError::InvalidUnits {
                value,
                expected: "1 (g), 2 (Gt)".to_string(),
            }),
        }
    }

    /// Factor converting to grams
    pub fn to_grams(&self) -> FloatValue {
        match self {
            MassUnits::Grams => 1.0,
            MassUnits::Gt => 1.0e15,
        }
    }
}

/// Output units of a synthesized spatial field
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialUnits {
    /// Keep the normalized (dimensionless) scale
    #[default]
    Norm,
    /// Centimetres of water equivalent thickness
    Cmwe,
    /// Millimetres of geoid height
    MmGeoid,
    /// Millimetres of elastic crustal deformation (Davis et al., 2004)
    MmUplift,
    /// Microgal gravitational perturbation
    MicroGal,
    /// Equivalent surface pressure in pascals
    Pascals,
}

impl SpatialUnits {
    /// 0: norm, 1: cmwe, 2: mm geoid, 3: mm uplift, 4: microGal, 5: Pa
    pub fn from_selector(selector: i64) -> GravResult<Self> {
        match selector {
            0 => Ok(SpatialUnits::Norm),
            1 => Ok(SpatialUnits::Cmwe),
            2 => Ok(SpatialUnits::MmGeoid),
            3 => Ok(SpatialUnits::MmUplift),
            4 => Ok(SpatialUnits::MicroGal),
            5 => Ok(SpatialUnits::Pascals),
            value => Err(GravError::InvalidUnits {
                value,
                expected: "0 (norm), 1 (cmwe), 2 (mmGH), 3 (mmCU), 4 (microGal), 5 (Pa)"
                    .to_string(),
            }),
        }
    }
}

/// Degree-dependent factors for a fixed Earth model and Love numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeFactors {
    /// Maximum degree of the factors
    pub lmax: usize,
    /// Average radius of the Earth (cm)
    pub rad_e: FloatValue,
    /// Average density of the Earth (g/cm^3)
    pub rho_e: FloatValue,
    /// Unit scale
    pub norm: Array1<FloatValue>,
    /// Centimetres water equivalent
    pub cmwe: Array1<FloatValue>,
    /// Millimetres water equivalent
    pub mmwe: Array1<FloatValue>,
    /// Millimetres geoid height
    pub mm_geoid: Array1<FloatValue>,
    /// Millimetres elastic crustal uplift
    pub mm_uplift: Array1<FloatValue>,
    /// Microgal gravity perturbation
    pub microgal: Array1<FloatValue>,
    /// Pascals equivalent surface pressure
    pub pascals: Array1<FloatValue>,
}

impl DegreeFactors {
    fn empty(lmax: usize, earth: &EarthParameters) -> Self {
        let zeros = Array1::zeros(lmax + 1);
        Self {
            lmax,
            rad_e: earth.average_radius(),
            rho_e: earth.average_density(),
            norm: Array1::ones(lmax + 1),
            cmwe: zeros.clone(),
            mmwe: zeros.clone(),
            mm_geoid: zeros.clone(),
            mm_uplift: zeros.clone(),
            microgal: zeros.clone(),
            pascals: zeros,
        }
    }

    /// Factors converting normalized harmonics into spatial fields
    ///
    /// Fails if the Love numbers stop short of `lmax`. Mass terms are left at
    /// zero where $1 + k_l$ vanishes (degree 1 in the CM frame).
    pub fn harmonic(
        lmax: usize,
        love: &LoveNumbers,
        earth: &EarthParameters,
    ) -> GravResult<Self> {
        love.ensure_degree(lmax)?;
        let mut factors = Self::empty(lmax, earth);
        let (rad_e, rho_e, rho_w) = (factors.rad_e, factors.rho_e, earth.rho_water);

        for l in 0..=lmax {
            let lf = l as FloatValue;
            let fraction = 1.0 + love.kl[l];
            factors.mm_geoid[l] = 10.0 * rad_e;
            factors.microgal[l] = 1.0e6 * earth.gm * (lf + 1.0) / rad_e.powi(2);
            if fraction == 0.0 {
                // Mass terms are undefined; leave them at zero
                continue;
            }
            factors.cmwe[l] = rho_e * rad_e * (2.0 * lf + 1.0) / (3.0 * rho_w * fraction);
            factors.mmwe[l] = 10.0 * factors.cmwe[l];
            factors.mm_uplift[l] = 10.0 * rad_e * love.hl[l] / fraction;
            // cm w.e. -> kg/m^2 -> Pa
            factors.pascals[l] = 10.0 * rho_w * factors.cmwe[l] * earth.standard_gravity / 100.0;
        }

        Ok(factors)
    }

    /// Factors converting surface mass into normalized harmonics
    ///
    /// Includes the $1/4\pi$ of the harmonic analysis integral, so that a
    /// point mass $M$ at $(\theta, \phi)$ contributes
    /// `cmwe[l] * M / (rho_w rad_e^2) * Pbar_lm(cos theta) * cos(m phi)`.
    pub fn spatial(
        lmax: usize,
        love: &LoveNumbers,
        earth: &EarthParameters,
    ) -> GravResult<Self> {
        love.ensure_degree(lmax)?;
        let mut factors = Self::empty(lmax, earth);
        let (rad_e, rho_e, rho_w) = (factors.rad_e, factors.rho_e, earth.rho_water);

        for l in 0..=lmax {
            let lf = l as FloatValue;
            let fraction = 1.0 + love.kl[l];
            factors.cmwe[l] =
                3.0 * rho_w * fraction / (1.0 + 2.0 * lf) / (4.0 * PI * rad_e * rho_e);
            factors.mmwe[l] = factors.cmwe[l] / 10.0;
            factors.mm_geoid[l] = 1.0 / (10.0 * rad_e * 4.0 * PI);
            factors.microgal[l] = rad_e.powi(2) / (1.0e6 * earth.gm * (lf + 1.0) * 4.0 * PI);
            if love.hl[l] != 0.0 {
                factors.mm_uplift[l] = fraction / (10.0 * rad_e * love.hl[l] * 4.0 * PI);
            }
            factors.pascals[l] = 100.0 * factors.mmwe[l] / (rho_w * earth.standard_gravity);
        }

        Ok(factors)
    }

    /// Factors for the requested output units
    pub fn get(&self, units: SpatialUnits) -> &Array1<FloatValue> {
        match units {
            SpatialUnits::Norm => &self.norm,
            SpatialUnits::Cmwe => &self.cmwe,
            SpatialUnits::MmGeoid => &self.mm_geoid,
            SpatialUnits::MmUplift => &self.mm_uplift,
            SpatialUnits::MicroGal => &self.microgal,
            SpatialUnits::Pascals => &self.pascals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prem_like(lmax: usize) -> LoveNumbers {
        let mut love = LoveNumbers::zeros(lmax);
        for l in 1..=lmax {
            let lf = l as FloatValue;
            love.hl[l] = -1.0 + 0.5 / lf;
            love.kl[l] = -0.3 / lf;
            love.ll[l] = 0.1 / lf;
        }
        love
    }

    #[test]
    fn test_load_units_selector() {
        assert_eq!(LoadUnits::from_selector(1).unwrap(), LoadUnits::Cmwe);
        assert_eq!(LoadUnits::from_selector(2).unwrap(), LoadUnits::Gt);
        assert_eq!(LoadUnits::from_selector(3).unwrap(), LoadUnits::Mmwe);
        assert!(matches!(
            LoadUnits::from_selector(4),
            Err(GravError::InvalidUnits { value: 4, .. })
        ));
    }

    #[test]
    fn test_load_units_serde_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            units: LoadUnits,
        }
        let w: Wrapper = toml::from_str("units = \"kg/m^2\"").unwrap();
        assert_eq!(w.units, LoadUnits::Mmwe);
        let w: Wrapper = toml::from_str("units = \"gt\"").unwrap();
        assert_eq!(w.units, LoadUnits::Gt);
    }

    #[test]
    fn test_water_thickness_equivalence() {
        let earth = EarthParameters::default();
        let area = 1.0e16; // cm^2
        let cm = LoadUnits::Cmwe.water_thickness_cm(2.0, area, &earth);
        let mm = LoadUnits::Mmwe.water_thickness_cm(20.0, area, &earth);
        // 2 g/cm^2 over 1e16 cm^2 is 2e16 g = 20 Gt
        let gt = LoadUnits::Gt.water_thickness_cm(20.0, area, &earth);
        assert_relative_eq!(cm, 2.0);
        assert_relative_eq!(mm, 2.0);
        assert_relative_eq!(gt, 2.0);
    }

    #[test]
    fn test_spatial_and_harmonic_cmwe_are_reciprocal() {
        let earth = EarthParameters::default();
        let love = prem_like(20);
        let spatial = DegreeFactors::spatial(20, &love, &earth).unwrap();
        let harmonic = DegreeFactors::harmonic(20, &love, &earth).unwrap();
        for l in 0..=20 {
            assert_relative_eq!(
                spatial.cmwe[l] * harmonic.cmwe[l] * 4.0 * PI,
                1.0,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_pascals_scale_water_column() {
        // 1 cm of water exerts rho * g * h = 1000 kg/m^3 * 9.80665 m/s^2 * 0.01 m
        let earth = EarthParameters::default();
        let love = LoveNumbers::zeros(4);
        let harmonic = DegreeFactors::harmonic(4, &love, &earth).unwrap();
        for l in 0..=4 {
            assert_relative_eq!(
                harmonic.pascals[l] / harmonic.cmwe[l],
                98.0665,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_harmonic_skips_vanishing_fraction() {
        let earth = EarthParameters::default();
        let mut love = LoveNumbers::zeros(3);
        love.kl[1] = -1.0;
        let harmonic = DegreeFactors::harmonic(3, &love, &earth).unwrap();
        assert_eq!(harmonic.cmwe[1], 0.0);
        assert!(harmonic.cmwe[2] > 0.0);
        assert!(harmonic.cmwe.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_factors_require_love_numbers() {
        let earth = EarthParameters::default();
        let love = LoveNumbers::zeros(3);
        assert!(DegreeFactors::spatial(5, &love, &earth).is_err());
        assert!(DegreeFactors::harmonic(5, &love, &earth).is_err());
    }

    #[test]
    fn test_factors_reject_uneven_love_numbers() {
        let earth = EarthParameters::default();
        let mut love = LoveNumbers::zeros(10);
        love.hl = Array1::zeros(2);
        love.ll = Array1::zeros(2);
        assert!(matches!(
            DegreeFactors::spatial(10, &love, &earth),
            Err(GravError::LoveNumbers(_))
        ));
        assert!(matches!(
            DegreeFactors::harmonic(10, &love, &earth),
            Err(GravError::LoveNumbers(_))
        ));
    }

    #[test]
    fn test_spatial_units_lookup() {
        let earth = EarthParameters::default();
        let love = LoveNumbers::zeros(2);
        let harmonic = DegreeFactors::harmonic(2, &love, &earth).unwrap();
        assert_eq!(harmonic.get(SpatialUnits::Norm)[2], 1.0);
        assert_eq!(harmonic.get(SpatialUnits::Cmwe), &harmonic.cmwe);
        assert!(SpatialUnits::from_selector(6).is_err());
        assert_eq!(
            SpatialUnits::from_selector(4).unwrap(),
            SpatialUnits::MicroGal
        );
    }
}
