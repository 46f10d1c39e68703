//! Errors for Rt estimation (series validation, preset checks, posterior
//! degeneracies, and interval-extraction failures).
//!
//! This module defines the estimation error type, [`RtError`], and a preset
//! error type, [`PresetError`], used across the Python-facing API and the
//! internal Rust core. Both implement `Display`/`Error` and convert to `PyErr`
//! when the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Case counts must be **finite, non-negative, and integer-valued**; date
//!   indices must be contiguous calendar days.
//! - Failures that occur at a known day carry the offending
//!   [`NaiveDate`](chrono::NaiveDate); the per-distribution interval routine
//!   has no date context, so batch callers stamp it on via
//!   [`RtError::at_date`].
//! - `statrs` distribution-construction errors are normalized to dedicated
//!   wrapper variants rather than leaking backend types.
use chrono::NaiveDate;
use statrs::distribution::{GammaError, NormalError, PoissonError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for estimation operations that may produce
/// [`RtError`].
pub type RtResult<T> = Result<T, RtError>;

/// Result alias for preset/grid construction paths that may produce
/// [`PresetError`].
pub type PresetResult<T> = Result<T, PresetError>;

/// Unified error type for Rt estimation.
///
/// Covers input/series validation, smoothing sample-size failures, posterior
/// recurrence degeneracies, interval-extraction failures, and preset issues
/// forwarded from [`PresetError`]. Implements `Display`/`Error` and converts
/// to a Python `ValueError` at PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum RtError {
    // ---- Series validation ----
    /// Series is empty.
    EmptySeries,

    /// Date index and count vector have different lengths.
    LengthMismatch { dates: usize, counts: usize },

    /// A count is NaN/±inf.
    NonFiniteCount { index: usize, value: f64 },

    /// A count is negative (case counts must be ≥ 0).
    NegativeCount { index: usize, value: f64 },

    /// A count has a fractional part (case counts must be whole numbers).
    NonIntegerCount { index: usize, value: f64 },

    /// Consecutive dates are not exactly one day apart.
    NonContiguousDates { prev: NaiveDate, next: NaiveDate },

    // ---- Smoothing / sample size ----
    /// Fewer than 2 days survive zero-trimming.
    InsufficientData { remaining: usize },

    // ---- Posterior recurrence ----
    /// The Bayes-update denominator was zero or non-finite on this day.
    DegenerateLikelihood { date: NaiveDate },

    /// The day-0 Gamma prior carries no mass on the Rt grid.
    DegeneratePrior { gamma_alpha: f64 },

    // ---- Interval extraction ----
    /// Distribution total mass is zero, negative, or non-finite.
    EmptyDistribution { date: Option<NaiveDate>, total_mass: f64 },

    /// No index pair strictly exceeds the requested credible mass.
    IntervalMassUnreachable { date: Option<NaiveDate>, requested: f64, attainable: f64 },

    /// Credible mass must lie strictly between 0 and 1.
    InvalidCredibleMass { value: f64 },

    // ---- Configuration ----
    /// Preset/grid construction failure.
    Preset(PresetError),

    // ---- statrs distribution errors ----
    /// Wrapper for statrs::distribution::PoissonError
    InvalidPoissonRate,

    /// Wrapper for statrs::distribution::NormalError
    InvalidGaussianStd,

    /// Wrapper for statrs::distribution::GammaError
    InvalidGammaShape,
}

impl RtError {
    /// Attach a date to variants that are produced without date context.
    ///
    /// The per-distribution interval routine sees a bare PMF; when the batch
    /// table runs it per posterior column, it stamps the failing column's
    /// date onto [`RtError::EmptyDistribution`] and
    /// [`RtError::IntervalMassUnreachable`]. All other variants pass through
    /// unchanged.
    pub fn at_date(self, date: NaiveDate) -> RtError {
        match self {
            RtError::EmptyDistribution { total_mass, .. } => {
                RtError::EmptyDistribution { date: Some(date), total_mass }
            }
            RtError::IntervalMassUnreachable { requested, attainable, .. } => {
                RtError::IntervalMassUnreachable { date: Some(date), requested, attainable }
            }
            other => other,
        }
    }
}

impl std::error::Error for RtError {}

impl std::fmt::Display for RtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Series validation ----
            RtError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            RtError::LengthMismatch { dates, counts } => {
                write!(f, "Date index has {dates} entries but counts have {counts}.")
            }
            RtError::NonFiniteCount { index, value } => {
                write!(f, "Count at index {index} is non-finite: {value}")
            }
            RtError::NegativeCount { index, value } => {
                write!(f, "Count at index {index} is negative: {value}")
            }
            RtError::NonIntegerCount { index, value } => {
                write!(f, "Count at index {index} is not a whole number: {value}")
            }
            RtError::NonContiguousDates { prev, next } => {
                write!(f, "Dates must advance one day at a time; got {prev} followed by {next}.")
            }
            // ---- Smoothing / sample size ----
            RtError::InsufficientData { remaining } => {
                write!(
                    f,
                    "Need at least 2 days after zero-trimming to estimate Rt; {remaining} remain."
                )
            }
            // ---- Posterior recurrence ----
            RtError::DegenerateLikelihood { date } => {
                write!(f, "Posterior update denominator degenerated on {date}.")
            }
            RtError::DegeneratePrior { gamma_alpha } => {
                write!(
                    f,
                    "Gamma({gamma_alpha}) prior has no mass on the Rt grid; widen the grid or lower the shape."
                )
            }
            // ---- Interval extraction ----
            RtError::EmptyDistribution { date, total_mass } => match date {
                Some(d) => {
                    write!(f, "Distribution on {d} has non-positive total mass: {total_mass}")
                }
                None => write!(f, "Distribution has non-positive total mass: {total_mass}"),
            },
            RtError::IntervalMassUnreachable { date, requested, attainable } => match date {
                Some(d) => write!(
                    f,
                    "No interval on {d} strictly exceeds mass {requested}; at most {attainable} is attainable."
                ),
                None => write!(
                    f,
                    "No interval strictly exceeds mass {requested}; at most {attainable} is attainable."
                ),
            },
            RtError::InvalidCredibleMass { value } => {
                write!(f, "Credible mass must lie strictly between 0 and 1; got: {value}")
            }
            // ---- Configuration ----
            RtError::Preset(err) => write!(f, "{err}"),
            // ---- statrs distribution errors ----
            RtError::InvalidPoissonRate => {
                write!(f, "Poisson distribution requires a finite rate > 0.")
            }
            RtError::InvalidGaussianStd => {
                write!(f, "Normal distribution requires a finite standard deviation > 0.")
            }
            RtError::InvalidGammaShape => {
                write!(f, "Gamma distribution requires finite shape and rate > 0.")
            }
        }
    }
}

/// Convert an [`RtError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl From<RtError> for PyErr {
    fn from(err: RtError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<PresetError> for RtError {
    fn from(err: PresetError) -> RtError {
        RtError::Preset(err)
    }
}

impl From<PoissonError> for RtError {
    fn from(_: PoissonError) -> RtError {
        RtError::InvalidPoissonRate
    }
}

impl From<NormalError> for RtError {
    fn from(_: NormalError) -> RtError {
        RtError::InvalidGaussianStd
    }
}

impl From<GammaError> for RtError {
    fn from(_: GammaError) -> RtError {
        RtError::InvalidGammaShape
    }
}

/// Errors specific to Rt-grid and preset construction.
///
/// Typical causes include malformed grids (wrong origin, uneven spacing),
/// non-positive hyperparameters, and unknown preset names.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetError {
    /// Grid has no points.
    EmptyGrid,

    /// Grid needs at least 2 points.
    GridTooShort { len: usize },

    /// A grid value is NaN/±inf.
    NonFiniteGridValue { index: usize, value: f64 },

    /// Grid must start at 0.
    GridNotFromZero { first: f64 },

    /// Grid values must be strictly ascending.
    GridNotAscending { index: usize },

    /// Grid values must be evenly spaced.
    GridNotEvenlySpaced { index: usize },

    /// Grid upper bound must be finite and > 0.
    InvalidGridMax { value: f64 },

    /// Process noise sigma must be finite and > 0.
    InvalidProcessSigma { value: f64 },

    /// Serial interval must be finite and > 0 (days).
    InvalidSerialInterval { value: f64 },

    /// Smoothing window must span at least 1 day.
    InvalidSmoothingWindow { value: usize },

    /// Gaussian kernel std must be finite and > 0.
    InvalidKernelStd { value: f64 },

    /// Gamma prior shape must be finite and > 0.
    InvalidGammaAlpha { value: f64 },

    /// Preset name is not one of the known sources.
    UnknownPreset { name: String },
}

impl std::error::Error for PresetError {}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetError::EmptyGrid => {
                write!(f, "Rt grid is empty.")
            }
            PresetError::GridTooShort { len } => {
                write!(f, "Rt grid needs at least 2 points; got {len}.")
            }
            PresetError::NonFiniteGridValue { index, value } => {
                write!(f, "Rt grid value at index {index} is non-finite: {value}")
            }
            PresetError::GridNotFromZero { first } => {
                write!(f, "Rt grid must start at 0; got {first}.")
            }
            PresetError::GridNotAscending { index } => {
                write!(f, "Rt grid must be strictly ascending; violated at index {index}.")
            }
            PresetError::GridNotEvenlySpaced { index } => {
                write!(f, "Rt grid must be evenly spaced; violated at index {index}.")
            }
            PresetError::InvalidGridMax { value } => {
                write!(f, "Rt grid upper bound must be finite and > 0; got: {value}")
            }
            PresetError::InvalidProcessSigma { value } => {
                write!(f, "Process sigma must be finite and > 0; got: {value}")
            }
            PresetError::InvalidSerialInterval { value } => {
                write!(f, "Serial interval must be finite and > 0 days; got: {value}")
            }
            PresetError::InvalidSmoothingWindow { value } => {
                write!(f, "Smoothing window must span at least 1 day; got: {value}")
            }
            PresetError::InvalidKernelStd { value } => {
                write!(f, "Gaussian kernel std must be finite and > 0; got: {value}")
            }
            PresetError::InvalidGammaAlpha { value } => {
                write!(f, "Gamma prior shape must be finite and > 0; got: {value}")
            }
            PresetError::UnknownPreset { name } => {
                write!(f, "Unknown preset {name:?} (expected 'LOFT' or 'ACT_NOW').")
            }
        }
    }
}

/// Convert a [`PresetError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<PresetError> for PyErr {
    fn from(err: PresetError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
