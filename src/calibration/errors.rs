//! errors — typed failures for process-noise calibration.
//!
//! Purpose
//! -------
//! Define the calibration-layer error surface: input validation failures
//! for candidate grids and series sets, plus a wrapper that carries an
//! estimation failure together with the index of the series that caused
//! it.
//!
//! Key behaviors
//! -------------
//! - Keep payloads structured (indices and offending values) so callers
//!   can report which candidate or series broke a calibration run.
//! - Embed the underlying [`RtError`] display text in
//!   [`CalibrationError::EstimationFailed`] so one message tells the whole
//!   story.
//! - Convert into `PyErr` (`ValueError`) behind the `python-bindings`
//!   feature, mirroring the `rt::errors` conversions.
//!
//! Conventions
//! -----------
//! - Variant payloads use named fields; messages are complete sentences
//!   ending in a period.
//! - `series_index` and candidate `index` are 0-based positions in the
//!   caller's input slices.
//!
//! Downstream usage
//! ----------------
//! - [`crate::calibration::sigma`] returns [`CalResult`] from grid
//!   construction and sigma selection; bindings rely on the `PyErr`
//!   conversion.
//!
//! Testing notes
//! -------------
//! - Unit tests cover `Display` payload formatting and the embedded
//!   estimation-failure text.
use crate::rt::errors::RtError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Convenience alias for calibration results.
pub type CalResult<T> = Result<T, CalibrationError>;

/// CalibrationError — failures raised while selecting a process sigma.
///
/// Purpose
/// -------
/// Surface calibration input problems (no candidates, no series, an
/// unusable candidate value) and per-series estimation failures with
/// enough structure to point at the offending input.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    // ---- Input validation -------------------------------------------------
    /// The candidate set is empty (or a grid request cannot produce one).
    NoCandidates,

    /// The series set is empty.
    NoSeries,

    /// A candidate sigma is not a finite, strictly positive number.
    InvalidSigmaCandidate { index: usize, value: f64 },

    // ---- Estimation -------------------------------------------------------
    /// Estimation failed for one series; carries the failing series'
    /// position and the underlying error.
    EstimationFailed { series_index: usize, error: RtError },
}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            CalibrationError::NoCandidates => {
                write!(f, "Calibration needs at least one candidate sigma.")
            }
            CalibrationError::NoSeries => {
                write!(f, "Calibration needs at least one case series.")
            }
            CalibrationError::InvalidSigmaCandidate { index, value } => {
                write!(
                    f,
                    "Candidate sigma at index {index} is {value}; candidates must be finite and \
                     strictly positive."
                )
            }

            // ---- Estimation ----
            CalibrationError::EstimationFailed { series_index, error } => {
                write!(f, "Estimation failed for series at index {series_index}: {error}")
            }
        }
    }
}

impl std::error::Error for CalibrationError {}

#[cfg(feature = "python-bindings")]
impl From<CalibrationError> for PyErr {
    fn from(err: CalibrationError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Display formatting for each variant, including payload embedding.
    // - The embedded underlying-error text in `EstimationFailed`.
    //
    // They intentionally DO NOT cover:
    // - PyErr conversions (exercised through the Python bindings).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify payload embedding in the input-validation messages.
    //
    // Given
    // -----
    // - An `InvalidSigmaCandidate` with index 3 and value -0.5.
    //
    // Expect
    // ------
    // - The message names both the index and the value.
    fn calibration_error_display_embeds_candidate_payload() {
        // Arrange
        let err = CalibrationError::InvalidSigmaCandidate { index: 3, value: -0.5 };

        // Act
        let message = err.to_string();

        // Assert
        assert!(message.contains("index 3"));
        assert!(message.contains("-0.5"));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `EstimationFailed` embeds the underlying error's message
    // and the failing series position.
    //
    // Given
    // -----
    // - An `EstimationFailed` wrapping `InsufficientData { remaining: 0 }`
    //   at series index 2.
    //
    // Expect
    // ------
    // - The message names index 2 and contains the inner message.
    fn calibration_error_display_embeds_underlying_error() {
        // Arrange
        let err = CalibrationError::EstimationFailed {
            series_index: 2,
            error: RtError::InsufficientData { remaining: 0 },
        };

        // Act
        let message = err.to_string();

        // Assert
        assert!(message.contains("series at index 2"));
        assert!(message.contains(&RtError::InsufficientData { remaining: 0 }.to_string()));
    }
}
