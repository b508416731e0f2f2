use thiserror::Error;

/// Error type for invalid load models and harmonic operations.
#[derive(Error, Debug)]
pub enum GravError {
    #[error("Invalid spherical cap size: {0}")]
    InvalidCapSize(String),
    #[error("Spherical cap size given more than once ({0}). Use exactly one of radius in degrees, radius in km or area")]
    ConflictingCapSize(String),
    #[error("Spherical cap size is required. Set one of radius in degrees, radius in km or area")]
    MissingCapSize,
    #[error("Invalid truncation: maximum order {mmax} exceeds maximum degree {lmax}")]
    InvalidTruncation { lmax: usize, mmax: usize },
    #[error("Legendre table has shape {rows}x{cols}, at least {needed_rows}x{needed_cols} is required")]
    LegendreShape {
        rows: usize,
        cols: usize,
        needed_rows: usize,
        needed_cols: usize,
    },
    #[error("Invalid load Love numbers: {0}")]
    LoveNumbers(String),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid units selector {value}. Expected one of {expected}")]
    InvalidUnits { value: i64, expected: String },
    #[error("Incompatible dimensions: {0}")]
    DimensionMismatch(String),
    #[error("Could not parse line {line}: {details}")]
    Parse { line: usize, details: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, GravError>`.
pub type GravResult<T> = Result<T, GravError>;
