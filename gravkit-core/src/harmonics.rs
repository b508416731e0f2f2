//! Spherical harmonic coefficient sets
//!
//! [`Harmonics`] stores fully-normalized cosine ($C_{lm}$) and sine ($S_{lm}$)
//! coefficients in `(lmax + 1, mmax + 1)` arrays indexed `[l, m]`. Entries
//! with `m > l` are always zero.
//!
//! # Examples
//!
//! ```rust
//! use gravkit_core::harmonics::Harmonics;
//!
//! let mut ylms = Harmonics::zeros(4, 2).unwrap();
//! ylms.clm[[2, 1]] = 1.0;
//! let doubled = ylms.scale(2.0);
//! assert_eq!(doubled.clm[[2, 1]], 2.0);
//! assert_eq!(doubled.degrees().to_vec(), vec![0, 1, 2, 3, 4]);
//! assert_eq!(doubled.orders().to_vec(), vec![0, 1, 2]);
//! ```

use crate::errors::{GravError, GravResult};
use crate::FloatValue;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

/// Cosine and sine spherical harmonic coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHarmonics")]
pub struct Harmonics {
    /// Cosine coefficients
    pub clm: Array2<FloatValue>,
    /// Sine coefficients
    pub slm: Array2<FloatValue>,
    lmax: usize,
    mmax: usize,
}

#[derive(Deserialize)]
struct RawHarmonics {
    clm: Array2<FloatValue>,
    slm: Array2<FloatValue>,
    lmax: usize,
    mmax: usize,
}

impl TryFrom<RawHarmonics> for Harmonics {
    type Error = GravError;

    fn try_from(raw: RawHarmonics) -> Result<Self, Self::Error> {
        let ylms = Harmonics::from_arrays(raw.clm, raw.slm)?;
        if ylms.lmax != raw.lmax || ylms.mmax != raw.mmax {
            return Err(GravError::DimensionMismatch(format!(
                "truncation {}/{} does not match coefficient shape {:?}",
                raw.lmax,
                raw.mmax,
                ylms.clm.dim()
            )));
        }
        Ok(ylms)
    }
}

impl Harmonics {
    /// All-zero coefficients truncated at `lmax` and `mmax`
    pub fn zeros(lmax: usize, mmax: usize) -> GravResult<Self> {
        check_truncation(lmax, mmax)?;
        Ok(Self {
            clm: Array2::zeros((lmax + 1, mmax + 1)),
            slm: Array2::zeros((lmax + 1, mmax + 1)),
            lmax,
            mmax,
        })
    }

    /// Wrap existing coefficient arrays
    ///
    /// Both arrays must share the shape `(lmax + 1, mmax + 1)` with `mmax <= lmax`.
    pub fn from_arrays(clm: Array2<FloatValue>, slm: Array2<FloatValue>) -> GravResult<Self> {
        if clm.dim() != slm.dim() {
            return Err(GravError::DimensionMismatch(format!(
                "clm has shape {:?} but slm has shape {:?}",
                clm.dim(),
                slm.dim()
            )));
        }
        let (rows, cols) = clm.dim();
        if rows == 0 || cols == 0 {
            return Err(GravError::DimensionMismatch(
                "coefficient arrays must not be empty".to_string(),
            ));
        }
        let (lmax, mmax) = (rows - 1, cols - 1);
        check_truncation(lmax, mmax)?;
        Ok(Self {
            clm,
            slm,
            lmax,
            mmax,
        })
    }

    /// Maximum spherical harmonic degree
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Maximum spherical harmonic order
    pub fn mmax(&self) -> usize {
        self.mmax
    }

    /// Degree labels `0..=lmax` of the coefficient rows
    pub fn degrees(&self) -> Array1<usize> {
        Array1::from_iter(0..=self.lmax)
    }

    /// Order labels `0..=mmax` of the coefficient columns
    pub fn orders(&self) -> Array1<usize> {
        Array1::from_iter(0..=self.mmax)
    }

    /// Return an error unless both arrays still have shape `(lmax + 1, mmax + 1)`
    ///
    /// The coefficient arrays are public and may have been replaced.
    pub fn check_shape(&self) -> GravResult<()> {
        let expected = (self.lmax + 1, self.mmax + 1);
        if self.clm.dim() != expected || self.slm.dim() != expected {
            return Err(GravError::DimensionMismatch(format!(
                "expected coefficient arrays of shape {:?}, got {:?} and {:?}",
                expected,
                self.clm.dim(),
                self.slm.dim()
            )));
        }
        Ok(())
    }

    fn check_same_truncation(&self, other: &Harmonics) -> GravResult<()> {
        self.check_shape()?;
        other.check_shape()?;
        if self.lmax != other.lmax || self.mmax != other.mmax {
            return Err(GravError::DimensionMismatch(format!(
                "truncation {}/{} does not match {}/{}",
                self.lmax, self.mmax, other.lmax, other.mmax
            )));
        }
        Ok(())
    }

    /// Element-wise sum of two coefficient sets
    pub fn add(&self, other: &Harmonics) -> GravResult<Harmonics> {
        self.check_same_truncation(other)?;
        Ok(Harmonics {
            clm: &self.clm + &other.clm,
            slm: &self.slm + &other.slm,
            lmax: self.lmax,
            mmax: self.mmax,
        })
    }

    /// Element-wise difference of two coefficient sets
    pub fn subtract(&self, other: &Harmonics) -> GravResult<Harmonics> {
        self.check_same_truncation(other)?;
        Ok(Harmonics {
            clm: &self.clm - &other.clm,
            slm: &self.slm - &other.slm,
            lmax: self.lmax,
            mmax: self.mmax,
        })
    }

    /// Multiply every coefficient by `factor`
    pub fn scale(&self, factor: FloatValue) -> Harmonics {
        Harmonics {
            clm: &self.clm * factor,
            slm: &self.slm * factor,
            lmax: self.lmax,
            mmax: self.mmax,
        }
    }

    /// Copy truncated to a lower degree and order
    pub fn truncate(&self, lmax: usize, mmax: usize) -> GravResult<Harmonics> {
        check_truncation(lmax, mmax)?;
        if lmax > self.lmax || mmax > self.mmax {
            return Err(GravError::InvalidTruncation { lmax, mmax });
        }
        let mut clm = self.clm.slice(s![..=lmax, ..=mmax]).to_owned();
        let mut slm = self.slm.slice(s![..=lmax, ..=mmax]).to_owned();
        // a lower lmax never exposes m > l, but a higher mmax might have been stored
        for l in 0..=lmax {
            for m in (l + 1)..=mmax {
                clm[[l, m]] = 0.0;
                slm[[l, m]] = 0.0;
            }
        }
        Ok(Harmonics {
            clm,
            slm,
            lmax,
            mmax,
        })
    }
}

/// Validate a degree/order truncation pair
pub fn check_truncation(lmax: usize, mmax: usize) -> GravResult<()> {
    if mmax > lmax {
        return Err(GravError::InvalidTruncation { lmax, mmax });
    }
    Ok(())
}
