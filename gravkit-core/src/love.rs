//! Load Love numbers
//!
//! Load Love numbers describe the elastic response of the solid Earth to a
//! surface load of degree $l$:
//!
//! - $h_l$: vertical displacement
//! - $k_l$: gravitational potential
//! - $l_l$: horizontal displacement
//!
//! Tables are usually computed from an Earth model such as PREM and shipped
//! as whitespace separated text. [`read_love_numbers`] reads that format.
//!
//! # Examples
//!
//! ```rust
//! use gravkit_core::love::{read_love_numbers, ReferenceFrame};
//!
//! let table = "\
//! # l   hl      kl      ll
//! 1  -0.290  0.000  0.113
//! 2  -1.001 -0.309  0.030
//! ";
//! let love = read_love_numbers(table.as_bytes(), 2, ReferenceFrame::CE).unwrap();
//! assert_eq!(love.lmax(), 2);
//! assert_eq!(love.kl[0], 0.0);
//! ```

use crate::errors::{GravError, GravResult};
use crate::FloatValue;
use log::{debug, warn};
use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Degree-1 reference frame of the Love numbers
///
/// Degree-1 Love numbers depend on the origin of the coordinate system
/// (Blewitt, 2003). The isomorphic frame parameter $\alpha$ is subtracted
/// from $h_1$, $k_1$ and $l_1$ of a centre-of-mass-of-solid-Earth table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Leave degree 1 as read
    #[default]
    None,
    /// Centre of mass of the Earth system, $\alpha = 1$
    CM,
    /// Centre of mass of the solid Earth, $\alpha = k_1$
    CE,
    /// Centre of surface figure, $\alpha = (h_1 + 2 l_1)/3$
    CF,
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceFrame::None => "None",
            ReferenceFrame::CM => "CM",
            ReferenceFrame::CE => "CE",
            ReferenceFrame::CF => "CF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ReferenceFrame {
    type Err = GravError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(ReferenceFrame::None),
            "CM" => Ok(ReferenceFrame::CM),
            "CE" => Ok(ReferenceFrame::CE),
            "CF" => Ok(ReferenceFrame::CF),
            other => Err(GravError::LoveNumbers(format!(
                "unknown reference frame '{}', expected one of CM, CE, CF",
                other
            ))),
        }
    }
}

/// Load Love numbers indexed by spherical harmonic degree
///
/// Deserialization goes through [`LoveNumbers::new`], so tables read from
/// serde formats are checked the same way as those built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLoveNumbers")]
pub struct LoveNumbers {
    /// Vertical displacement Love numbers
    pub hl: Array1<FloatValue>,
    /// Gravitational potential Love numbers
    pub kl: Array1<FloatValue>,
    /// Horizontal displacement Love numbers
    pub ll: Array1<FloatValue>,
}

#[derive(Deserialize)]
struct RawLoveNumbers {
    hl: Array1<FloatValue>,
    kl: Array1<FloatValue>,
    ll: Array1<FloatValue>,
}

impl TryFrom<RawLoveNumbers> for LoveNumbers {
    type Error = GravError;

    fn try_from(raw: RawLoveNumbers) -> Result<Self, Self::Error> {
        LoveNumbers::new(raw.hl, raw.kl, raw.ll)
    }
}

impl LoveNumbers {
    /// Create from three degree-indexed sequences of equal length
    pub fn new(
        hl: Array1<FloatValue>,
        kl: Array1<FloatValue>,
        ll: Array1<FloatValue>,
    ) -> GravResult<Self> {
        if hl.is_empty() {
            return Err(GravError::LoveNumbers(
                "at least degree 0 is required".to_string(),
            ));
        }
        if hl.len() != kl.len() || hl.len() != ll.len() {
            return Err(GravError::LoveNumbers(format!(
                "hl, kl and ll must have equal length, got {}, {} and {}",
                hl.len(),
                kl.len(),
                ll.len()
            )));
        }
        Ok(Self { hl, kl, ll })
    }

    /// Love numbers of a rigid Earth (all zero) up to `lmax`
    pub fn zeros(lmax: usize) -> Self {
        Self {
            hl: Array1::zeros(lmax + 1),
            kl: Array1::zeros(lmax + 1),
            ll: Array1::zeros(lmax + 1),
        }
    }

    // Number of degrees present in all three sequences
    fn num_degrees(&self) -> usize {
        self.hl.len().min(self.kl.len()).min(self.ll.len())
    }

    /// Highest degree available in all three sequences (0 for an empty table)
    pub fn lmax(&self) -> usize {
        self.num_degrees().saturating_sub(1)
    }

    /// Return an error unless degrees `0..=lmax` are available for `hl`, `kl`
    /// and `ll`
    pub fn ensure_degree(&self, lmax: usize) -> GravResult<()> {
        let available = self.num_degrees();
        if available <= lmax {
            return Err(GravError::LoveNumbers(format!(
                "Love numbers cover {} degrees (hl {}, kl {}, ll {}), degree {} is required",
                available,
                self.hl.len(),
                self.kl.len(),
                self.ll.len(),
                lmax
            )));
        }
        Ok(())
    }

    /// Copy of the table truncated to degree `lmax`
    pub fn truncate(&self, lmax: usize) -> GravResult<Self> {
        self.ensure_degree(lmax)?;
        Ok(Self {
            hl: self.hl.slice(s![..=lmax]).to_owned(),
            kl: self.kl.slice(s![..=lmax]).to_owned(),
            ll: self.ll.slice(s![..=lmax]).to_owned(),
        })
    }

    /// Convert the degree-1 values to another reference frame
    pub fn to_frame(mut self, frame: ReferenceFrame) -> Self {
        if self.num_degrees() < 2 {
            return self;
        }
        let alpha = match frame {
            ReferenceFrame::None => return self,
            ReferenceFrame::CM => 1.0,
            ReferenceFrame::CE => self.kl[1],
            ReferenceFrame::CF => (self.hl[1] + 2.0 * self.ll[1]) / 3.0,
        };
        debug!("Shifting degree-1 Love numbers to {} (alpha={})", frame, alpha);
        self.hl[1] -= alpha;
        self.kl[1] -= alpha;
        self.ll[1] -= alpha;
        self
    }

    /// Read a Love number file from disk
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        lmax: usize,
        frame: ReferenceFrame,
    ) -> GravResult<Self> {
        let file = File::open(path.as_ref())?;
        read_love_numbers(BufReader::new(file), lmax, frame)
    }
}

fn parse_float(token: &str, line: usize) -> GravResult<FloatValue> {
    // Fortran double precision exponents
    let normalized = token.replace(['D', 'd'], "E");
    normalized.parse::<FloatValue>().map_err(|e| GravError::Parse {
        line,
        details: format!("'{}': {}", token, e),
    })
}

/// Read load Love numbers up to degree `lmax` from a text table
///
/// Each data row holds `l hl kl ll` separated by whitespace. Blank lines,
/// `#` comments and header rows whose first column is not an integer are
/// skipped. Degree 0 defaults to zero when absent; any other missing
/// degree up to `lmax` is an error. Rows beyond `lmax` are ignored.
pub fn read_love_numbers<R: Read>(
    reader: R,
    lmax: usize,
    frame: ReferenceFrame,
) -> GravResult<LoveNumbers> {
    let mut love = LoveNumbers::zeros(lmax);
    let mut seen = vec![false; lmax + 1];
    seen[0] = true;

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let columns: Vec<&str> = content.split_whitespace().collect();
        let degree = match columns[0].parse::<usize>() {
            Ok(degree) => degree,
            Err(_) => {
                debug!("Skipping header line {}: {}", line_number, content);
                continue;
            }
        };
        if degree > lmax {
            continue;
        }
        if columns.len() < 4 {
            return Err(GravError::Parse {
                line: line_number,
                details: format!("expected 4 columns (l hl kl ll), got {}", columns.len()),
            });
        }
        love.hl[degree] = parse_float(columns[1], line_number)?;
        love.kl[degree] = parse_float(columns[2], line_number)?;
        love.ll[degree] = parse_float(columns[3], line_number)?;
        if seen[degree] && degree != 0 {
            warn!("Degree {} appears more than once, keeping the last row", degree);
        }
        seen[degree] = true;
    }

    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(GravError::LoveNumbers(format!(
            "table does not contain degree {} (required up to {})",
            missing, lmax
        )));
    }

    Ok(love.to_frame(frame))
}
