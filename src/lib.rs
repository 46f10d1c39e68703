//! rust_epirt — Bayesian Rt estimation for epidemic case series, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the Rt estimation pipeline to Python via the `_rust_epirt`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing estimator class and calibration
//! function used by the `rust_epirt` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`rt` and `calibration`) as the
//!   public crate surface.
//! - Define the `#[pyclass]` wrapper [`RtEstimator`], the `#[pyfunction]`
//!   sigma-selection entry point, and the `#[pymodule]` initializer for
//!   the `_rust_epirt` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input conversion, and error
//!   mapping.
//! - When `python-bindings` is enabled, the Python-visible API mirrors the
//!   invariants and signatures of its Rust counterparts ([`RtModel`],
//!   [`select_process_sigma`]).
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules hold (validated series,
//!   validated presets).
//!
//! Conventions
//! -----------
//! - Dates cross the boundary as ISO strings (`"2020-03-01"`); case counts
//!   cross as 1-D float64 arrays, pandas Series, or plain sequences.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules
//!   and can ignore the PyO3 items guarded by the `python-bindings`
//!   feature.
//! - The Python packaging layer imports the `_rust_epirt` module defined
//!   here and wraps its items in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the crate's integration tests; Python smoke tests verify that
//!   the estimator can be constructed, run, and queried from Python.

pub mod calibration;
pub mod rt;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use pyo3::types::PyAny;

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::sigma::CalibrationOptions,
    rt::models::bayesian::RtModel,
    utils::{build_rt_model, extract_case_series, extract_series_set},
};

/// RtEstimator — Python-facing wrapper for the Bayesian Rt pipeline.
///
/// Purpose
/// -------
/// Expose the [`RtModel`] API to Python callers while preserving the core
/// Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Build an [`RtModel`] from a preset name and an optional credible
///   mass.
/// - Provide a `run` method that converts a start date plus a counts
///   array into a validated series, runs the full pipeline, and returns
///   plain `(date, most_likely, low, high)` tuples.
/// - Expose the cached log-likelihood and the configured credible mass as
///   read-only properties.
///
/// Parameters
/// ----------
/// Constructed from Python via `RtEstimator(preset='LOFT', credible_mass=0.95)`:
/// - `preset`: `Option<&str>`
///   Preset name, `'LOFT'` or `'ACT_NOW'` (case-insensitive); defaults to
///   `'LOFT'`.
/// - `credible_mass`: `Option<f64>`
///   Credible mass for reported intervals, strictly between 0 and 1;
///   defaults to 0.95.
///
/// Fields
/// ------
/// - `inner`: [`RtModel`]
///   Rust-side model holding the preset, mass, and cached posteriors.
///
/// Invariants
/// ----------
/// - `inner` is always a well-formed [`RtModel`]; the preset and mass are
///   validated at construction.
///
/// Performance
/// -----------
/// - At most one allocation copies Python data into a Rust buffer per
///   `run`; property access is O(1).
///
/// Notes
/// -----
/// - This type is primarily intended to be used from Python; native Rust
///   code should prefer [`RtModel`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_epirt")]
pub struct RtEstimator {
    /// Underlying Rust RtModel.
    inner: RtModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl RtEstimator {
    /// Bayesian Rt estimator over a fixed grid.
    ///
    /// Runs Gaussian smoothing, a sequential Bayes filter, and
    /// highest-density-interval extraction in one call.
    #[new]
    #[pyo3(
        text_signature = "(preset='LOFT', credible_mass=0.95)",
        signature = (preset = None, credible_mass = None)
    )]
    pub fn new(preset: Option<&str>, credible_mass: Option<f64>) -> PyResult<RtEstimator> {
        let inner = build_rt_model(preset, credible_mass)?;
        Ok(RtEstimator { inner })
    }

    #[pyo3(
        signature = (start_date, cases),
        text_signature = "(self, start_date, cases, /)"
    )]
    pub fn run<'py>(
        &mut self, py: Python<'py>, start_date: &str, cases: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<(String, f64, f64, f64)>> {
        let series = extract_case_series(py, start_date, cases)?;
        let estimates = self.inner.run(&series)?;
        Ok(estimates
            .iter()
            .map(|e| (e.date.to_string(), e.most_likely, e.low, e.high))
            .collect())
    }

    /// Accumulated log-likelihood of the last successful run, or None.
    #[getter]
    pub fn log_likelihood(&self) -> Option<f64> {
        self.inner.log_likelihood()
    }

    /// Credible mass reported intervals enclose.
    #[getter]
    pub fn credible_mass(&self) -> f64 {
        self.inner.credible_mass()
    }
}

/// select_process_sigma — Python-facing maximum-likelihood sigma selection.
///
/// Purpose
/// -------
/// Mirror [`calibration::sigma::select_process_sigma`] for Python callers:
/// score candidate process sigmas by total filter log-likelihood across a
/// set of case series and return the winner with every candidate's score.
///
/// Parameters
/// ----------
/// Called from Python via
/// `select_process_sigma(series, sigmas, preset='LOFT', verbose=False)`:
/// - `series`: `&PyAny`
///   Sequence of `(start_date, cases)` pairs, one per series.
/// - `sigmas`: `Vec<f64>`
///   Candidate sigmas; finite and strictly positive.
/// - `preset`: `Option<&str>`
///   Base preset name; each candidate replaces only its process sigma.
/// - `verbose`: `Option<bool>`
///   When true, print one progress line per candidate to stderr.
///
/// Returns
/// -------
/// `PyResult<(f64, f64, Vec<(f64, f64)>)>`
///   `(best_sigma, best_total_log_likelihood, [(sigma, total), ...])` with
///   scores in candidate input order.
///
/// Errors
/// ------
/// - `ValueError`
///   For empty inputs, unusable candidates, malformed series, or
///   estimation failures; messages carry the offending index.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    text_signature = "(series, sigmas, /, preset='LOFT', verbose=False)",
    signature = (series, sigmas, preset = None, verbose = None)
)]
pub fn select_process_sigma<'py>(
    py: Python<'py>, series: &Bound<'py, PyAny>, sigmas: Vec<f64>, preset: Option<&str>,
    verbose: Option<bool>,
) -> PyResult<(f64, f64, Vec<(f64, f64)>)> {
    let series_set = extract_series_set(py, series)?;
    let base = crate::utils::extract_preset(preset)?;
    let options = CalibrationOptions { verbose: verbose.unwrap_or(false) };

    let selection =
        crate::calibration::sigma::select_process_sigma(&series_set, &base, &sigmas, &options)?;

    let scores = selection
        .scores
        .iter()
        .map(|score| (score.sigma, score.total_log_likelihood))
        .collect();
    Ok((selection.best_sigma, selection.best_total_log_likelihood, scores))
}

/// _rust_epirt — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_epirt` Python module and register the estimator class
/// and calibration function used by the public `rust_epirt` package.
///
/// Key behaviors
/// -------------
/// - Register [`RtEstimator`] and [`select_process_sigma`] directly on the
///   module; the surface is small enough not to need submodules.
///
/// Parameters
/// ----------
/// - `_py`: [`Python`]
///   GIL token provided by PyO3 during module initialization.
/// - `m`: `&Bound<PyModule>`
///   Module object representing `_rust_epirt`.
///
/// Returns
/// -------
/// `PyResult<()>`
///   `Ok(())` on success, or a Python exception if registration fails.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_epirt<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<RtEstimator>()?;
    m.add_function(wrap_pyfunction!(select_process_sigma, m)?)?;
    Ok(())
}
