//! calibration — process-noise selection on top of the Rt stack.
//!
//! Purpose
//! -------
//! Provide the offline companion to `rt`: score candidate process sigmas
//! by total filter log-likelihood across a set of case series and pick
//! the maximum-likelihood winner. The published presets' sigma constants
//! are products of exactly this procedure.
//!
//! Key behaviors
//! -------------
//! - Build candidate grids and run the selection in [`sigma`]
//!   ([`sigma_grid`], [`select_process_sigma`]), with per-candidate
//!   scores returned alongside the winner.
//! - Score series in parallel per candidate while keeping collection and
//!   summation order fixed, so selections are bitwise reproducible.
//! - Centralize calibration failures in [`errors`]
//!   ([`CalibrationError`], [`CalResult`]), wrapping per-series
//!   estimation errors with the failing series' index.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated before any estimation: candidate sets and
//!   series sets must be non-empty and candidates finite and strictly
//!   positive.
//! - Scores appear in candidate input order; ties go to the earliest
//!   candidate.
//!
//! Conventions
//! -----------
//! - Progress output is opt-in via [`CalibrationOptions::verbose`] and
//!   goes to stderr; the layer is silent otherwise.
//!
//! Downstream usage
//! ----------------
//! - Run [`select_process_sigma`] over historical series, then build
//!   production presets with `RtPreset::with_process_sigma` using
//!   [`SigmaSelection::best_sigma`]. The Python bindings expose the same
//!   entry point.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`sigma`] cover grid construction, winner selection,
//!   validation order, failure wrapping, and determinism; [`errors`]
//!   tests cover message formatting.

pub mod errors;
pub mod sigma;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{CalResult, CalibrationError};
pub use self::sigma::{
    CalibrationOptions, SigmaScore, SigmaSelection, select_process_sigma, sigma_grid,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_epirt::calibration::prelude::*;
//
// to import the calibration surface in a single line.

pub mod prelude {
    pub use super::errors::{CalResult, CalibrationError};
    pub use super::sigma::{
        CalibrationOptions, SigmaScore, SigmaSelection, select_process_sigma, sigma_grid,
    };
}
