//! Spherical harmonic load models for satellite gravimetry
//!
//! Converts surface mass loads (uniform spherical caps and point masses)
//! into fully-normalized gravitational spherical harmonic coefficients,
//! accounting for the elastic response of the Earth through load Love
//! numbers, and synthesizes spatial fields back from coefficients.

pub mod clenshaw;
pub mod errors;
pub mod harmonics;
pub mod legendre;
pub mod love;
pub mod parameters;
pub mod point_load;
#[cfg(feature = "python")]
pub mod python;
pub mod spherical_cap;
pub mod units;

pub type FloatValue = f64;

pub use errors::{GravError, GravResult};
pub use harmonics::Harmonics;
pub use spherical_cap::{gen_spherical_cap, CapSize, SphericalCapOptions};
