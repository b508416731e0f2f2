//! Earth model parameters
//!
//! Physical constants shared by every conversion between surface loads and
//! normalized gravitational coefficients. All quantities are in cgs units,
//! which is the convention of the published GRACE processing literature.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Reference Earth used to scale surface mass into Stokes coefficients
///
/// The average radius and density are derived from the ellipsoid and the
/// geocentric gravitational constant:
///
/// $$R = a (1 - f)^{1/3}$$
///
/// $$\rho_e = \frac{3 GM}{4 \pi G R^3}$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthParameters {
    /// Semi-major axis of the reference ellipsoid (cm).
    ///
    /// Default: 6.378137e8 cm (WGS84)
    pub a_axis: f64,

    /// Flattening of the reference ellipsoid.
    ///
    /// Default: 1/298.257223563 (WGS84)
    pub flattening: f64,

    /// Geocentric gravitational constant (cm^3/s^2).
    ///
    /// Default: 3.986004418e20 cm^3/s^2
    pub gm: f64,

    /// Universal gravitational constant (cm^3/(g s^2)).
    ///
    /// Default: 6.67430e-8 (CODATA 2018)
    pub gravitational_constant: f64,

    /// Standard gravity used for pressure conversions (cm/s^2).
    ///
    /// Default: 980.665 cm/s^2
    pub standard_gravity: f64,

    /// Density of water (g/cm^3).
    ///
    /// Default: 1.0 g/cm^3
    pub rho_water: f64,
}

impl Default for EarthParameters {
    fn default() -> Self {
        Self {
            a_axis: 6.378137e8,              // cm
            flattening: 1.0 / 298.257223563, // WGS84
            gm: 3.986004418e20,              // cm^3/s^2
            gravitational_constant: 6.67430e-8,
            standard_gravity: 980.665, // cm/s^2
            rho_water: 1.0,            // g/cm^3
        }
    }
}

impl EarthParameters {
    /// Radius of the sphere with the ellipsoid's volume (cm)
    pub fn average_radius(&self) -> f64 {
        self.a_axis * (1.0 - self.flattening).cbrt()
    }

    /// Average radius in kilometres
    pub fn average_radius_km(&self) -> f64 {
        self.average_radius() / 1.0e5
    }

    /// Average density of the Earth (g/cm^3)
    pub fn average_density(&self) -> f64 {
        let rad_e = self.average_radius();
        0.75 * self.gm / (self.gravitational_constant * PI * rad_e.powi(3))
    }

    /// Total mass of the Earth (g)
    pub fn mass(&self) -> f64 {
        self.gm / self.gravitational_constant
    }
}
