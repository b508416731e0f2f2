//! Configuration of a spherical cap run
//!
//! A TOML document describing the truncation, cap size, units, Love numbers
//! and Earth model:
//!
//! ```toml
//! lmax = 60
//! radius_km = 150.0
//! units = "gt"
//! love_numbers = "data/love_numbers"
//! reference_frame = "CF"
//!
//! [earth]
//! rho_water = 1.0
//! ```
//!
//! The three cap size keys are mutually exclusive and validated when the
//! options are built.

use crate::errors::{GravError, GravResult};
use crate::love::{LoveNumbers, ReferenceFrame};
use crate::parameters::EarthParameters;
use crate::spherical_cap::{CapSize, SphericalCapOptions};
use crate::units::LoadUnits;
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_lmax() -> usize {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphericalCapConfig {
    /// Upper bound of spherical harmonic degrees
    ///
    /// Default: 60
    #[serde(default = "default_lmax")]
    pub lmax: usize,

    /// Upper bound of spherical harmonic orders (defaults to `lmax`)
    #[serde(default)]
    pub mmax: Option<usize>,

    /// Angular radius of the cap in degrees
    #[serde(default)]
    pub radius_degrees: Option<FloatValue>,

    /// Radius of the cap along the surface in km
    #[serde(default)]
    pub radius_km: Option<FloatValue>,

    /// Area of the cap in km^2
    #[serde(default)]
    pub area_km2: Option<FloatValue>,

    /// Units of the load magnitude
    #[serde(default)]
    pub units: LoadUnits,

    /// Load Love number table, relative paths resolve against the config file
    ///
    /// Without a table the Earth is treated as rigid ($k_l = h_l = l_l = 0$).
    #[serde(default)]
    pub love_numbers: Option<PathBuf>,

    /// Degree-1 reference frame applied to the Love numbers
    #[serde(default)]
    pub reference_frame: ReferenceFrame,

    #[serde(default)]
    pub earth: EarthParameters,
}

impl SphericalCapConfig {
    pub fn from_toml_str(content: &str) -> GravResult<Self> {
        toml::from_str(content).map_err(|e| GravError::Config(e.to_string()))
    }

    /// Read a configuration file
    ///
    /// A relative `love_numbers` path is taken relative to the file's directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> GravResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let (Some(love), Some(parent)) = (&config.love_numbers, path.parent()) {
            if love.is_relative() {
                config.love_numbers = Some(parent.join(love));
            }
        }
        Ok(config)
    }

    /// Validated cap size
    pub fn cap_size(&self) -> GravResult<CapSize> {
        CapSize::from_options(self.radius_degrees, self.radius_km, self.area_km2)
    }

    /// Load Love numbers up to `lmax` in the configured frame
    pub fn love_numbers(&self) -> GravResult<LoveNumbers> {
        match &self.love_numbers {
            Some(path) => LoveNumbers::from_path(path, self.lmax, self.reference_frame),
            None => Ok(LoveNumbers::zeros(self.lmax)),
        }
    }

    /// Options for [`crate::spherical_cap::gen_spherical_cap`]
    pub fn to_options(&self) -> GravResult<SphericalCapOptions> {
        let mut options =
            SphericalCapOptions::new(self.lmax, self.cap_size()?, self.love_numbers()?)
                .with_units(self.units)
                .with_earth(self.earth.clone());
        if let Some(mmax) = self.mmax {
            options = options.with_mmax(mmax);
        }
        Ok(options)
    }
}
