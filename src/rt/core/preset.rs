//! preset — Rt candidate grids and estimation hyperparameter presets.
//!
//! Purpose
//! -------
//! Provide a small, validated configuration layer for the Rt estimation
//! pipeline: the discretized grid of candidate Rt values ([`RtGrid`]) and the
//! bundle of hyperparameters that drive smoothing, the drift process, and the
//! day-0 prior ([`RtPreset`]), including the two named presets carried over
//! from the original parameter tables.
//!
//! Key behaviors
//! -------------
//! - Construct grids either as a linspace from 0 ([`RtGrid::linear`]) or from
//!   caller-supplied values with origin/order/spacing checks
//!   ([`RtGrid::from_values`]).
//! - Construct hyperparameter bundles with positivity/finiteness checks
//!   ([`RtPreset::new`]) and expose the published presets
//!   ([`RtPreset::loft`], [`RtPreset::act_now`], [`RtPreset::from_name`]).
//! - Derive sigma-swapped copies for calibration sweeps
//!   ([`RtPreset::with_process_sigma`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Grids are evenly spaced, strictly ascending, start at exactly 0, hold at
//!   least 2 finite points, and are shared by every day of a run.
//! - All preset scalars are finite and strictly positive; the smoothing
//!   window spans at least 1 day.
//! - Invalid configurations return [`PresetError`] rather than panicking.
//!
//! Conventions
//! -----------
//! - Preset names match the original sources: `"LOFT"` and `"ACT_NOW"`,
//!   resolved case-insensitively.
//! - The serial interval is measured in days.
//!
//! Downstream usage
//! ----------------
//! - The smoother reads `smoothing_window` / `kernel_std`; the posterior
//!   engine reads the grid, `process_sigma`, `serial_interval`, and
//!   `gamma_alpha`; calibration sweeps `process_sigma` candidates through
//!   [`RtPreset::with_process_sigma`].
//!
//! Testing notes
//! -------------
//! - Unit tests pin the published preset constants, exercise every grid and
//!   preset rejection path, and check name resolution.
use ndarray::Array1;

use crate::rt::errors::{PresetError, PresetResult};

/// Relative tolerance for the even-spacing check in [`RtGrid::from_values`].
const SPACING_REL_TOL: f64 = 1e-9;

/// RtGrid — ordered candidate Rt values shared by every day of a run.
///
/// Purpose
/// -------
/// Discretize the Rt axis once so likelihoods, drift kernels, priors, and
/// posteriors all line up index-for-index across the whole pipeline.
///
/// Invariants
/// ----------
/// - At least 2 points, all finite.
/// - `values[0] == 0.0`, strictly ascending, evenly spaced.
///
/// Notes
/// -----
/// - Even spacing is not exploited numerically, but it keeps interval widths
///   comparable across the grid and matches the published presets; it is
///   therefore validated rather than assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct RtGrid {
    values: Array1<f64>,
}

impl RtGrid {
    /// Construct an evenly spaced grid over `[0, max]` with `points` entries.
    ///
    /// Parameters
    /// ----------
    /// - `max`: `f64`
    ///   Upper bound of the grid (the largest candidate Rt). Finite, > 0.
    /// - `points`: `usize`
    ///   Number of grid entries including both endpoints. At least 2.
    ///
    /// Returns
    /// -------
    /// PresetResult<RtGrid>
    ///   - `Ok(RtGrid)` spanning `0, max/(points-1), ..., max`.
    ///   - `Err(PresetError::InvalidGridMax { .. })` for a non-finite or
    ///     non-positive bound.
    ///   - `Err(PresetError::GridTooShort { .. })` for fewer than 2 points.
    pub fn linear(max: f64, points: usize) -> PresetResult<RtGrid> {
        if !max.is_finite() || max <= 0.0 {
            return Err(PresetError::InvalidGridMax { value: max });
        }
        if points < 2 {
            return Err(PresetError::GridTooShort { len: points });
        }
        let denom = (points - 1) as f64;
        let values = Array1::from_iter((0..points).map(|i| max * (i as f64) / denom));
        Ok(RtGrid { values })
    }

    /// Construct a grid from caller-supplied values, validating shape.
    ///
    /// Parameters
    /// ----------
    /// - `values`: `Array1<f64>`
    ///   Candidate Rt values, ascending from 0.
    ///
    /// Returns
    /// -------
    /// PresetResult<RtGrid>
    ///   - `Ok(RtGrid)` when the values are finite, start at exactly 0, are
    ///     strictly ascending, and are evenly spaced within a relative
    ///     tolerance of the first step.
    ///   - The matching `PresetError` variant otherwise, reporting the first
    ///     offending index.
    pub fn from_values(values: Array1<f64>) -> PresetResult<RtGrid> {
        if values.is_empty() {
            return Err(PresetError::EmptyGrid);
        }
        if values.len() < 2 {
            return Err(PresetError::GridTooShort { len: values.len() });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(PresetError::NonFiniteGridValue { index, value });
            }
        }
        if values[0] != 0.0 {
            return Err(PresetError::GridNotFromZero { first: values[0] });
        }
        let step = values[1] - values[0];
        let tol = step.abs() * SPACING_REL_TOL + f64::EPSILON;
        for index in 1..values.len() {
            let diff = values[index] - values[index - 1];
            if diff <= 0.0 {
                return Err(PresetError::GridNotAscending { index });
            }
            if (diff - step).abs() > tol {
                return Err(PresetError::GridNotEvenlySpaced { index });
            }
        }
        Ok(RtGrid { values })
    }

    /// Candidate Rt values, ascending.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid is empty (never true for validated grids).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// RtPreset — hyperparameters for one end-to-end estimation run.
///
/// Purpose
/// -------
/// Bundle the validated knobs of the pipeline: the Rt grid, the
/// random-walk drift scale applied between days, the serial interval that
/// links Rt to the expected case growth, and the smoothing/prior settings.
///
/// Fields
/// ------
/// - `grid`: [`RtGrid`]
///   Candidate Rt values.
/// - `process_sigma`: `f64`
///   Std of the Gaussian drift applied to the posterior between days.
///   Smaller values trust history more; larger values forget faster.
/// - `serial_interval`: `f64`
///   Mean days between successive infections in a transmission chain.
/// - `smoothing_window`: `usize`
///   Width (days) of the centered Gaussian smoothing window.
/// - `kernel_std`: `f64`
///   Std (days) of the Gaussian smoothing kernel.
/// - `gamma_alpha`: `f64`
///   Shape of the unit-rate Gamma prior placed on Rt for day 0.
///
/// Invariants
/// ----------
/// - All scalar fields finite and > 0; `smoothing_window >= 1`.
///
/// Notes
/// -----
/// - The published presets fix the serial interval at 8.0 days
///   (0.5 × mild-case duration 6 + incubation period 5, per the upstream
///   epidemiological configuration). Callers with a different disease
///   profile construct their own preset via [`RtPreset::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct RtPreset {
    /// Candidate Rt values.
    pub grid: RtGrid,
    /// Std of the between-day Gaussian drift on Rt.
    pub process_sigma: f64,
    /// Mean serial interval in days.
    pub serial_interval: f64,
    /// Centered smoothing window width in days.
    pub smoothing_window: usize,
    /// Std of the Gaussian smoothing kernel in days.
    pub kernel_std: f64,
    /// Shape of the unit-rate Gamma day-0 prior.
    pub gamma_alpha: f64,
}

impl RtPreset {
    /// Construct a validated preset from explicit hyperparameters.
    ///
    /// Returns
    /// -------
    /// PresetResult<RtPreset>
    ///   - `Ok(RtPreset)` when every scalar is finite and positive and the
    ///     window spans at least one day.
    ///   - The matching `PresetError` variant for the first violated check.
    pub fn new(
        grid: RtGrid, process_sigma: f64, serial_interval: f64, smoothing_window: usize,
        kernel_std: f64, gamma_alpha: f64,
    ) -> PresetResult<RtPreset> {
        if !process_sigma.is_finite() || process_sigma <= 0.0 {
            return Err(PresetError::InvalidProcessSigma { value: process_sigma });
        }
        if !serial_interval.is_finite() || serial_interval <= 0.0 {
            return Err(PresetError::InvalidSerialInterval { value: serial_interval });
        }
        if smoothing_window == 0 {
            return Err(PresetError::InvalidSmoothingWindow { value: smoothing_window });
        }
        if !kernel_std.is_finite() || kernel_std <= 0.0 {
            return Err(PresetError::InvalidKernelStd { value: kernel_std });
        }
        if !gamma_alpha.is_finite() || gamma_alpha <= 0.0 {
            return Err(PresetError::InvalidGammaAlpha { value: gamma_alpha });
        }
        Ok(RtPreset {
            grid,
            process_sigma,
            serial_interval,
            smoothing_window,
            kernel_std,
            gamma_alpha,
        })
    }

    /// The `LOFT` preset: dense grid to Rt = 12, slow-moving prior.
    ///
    /// Grid `linspace(0, 12, 1201)`, sigma 0.01, serial interval 8.0 days,
    /// window 7, kernel std 2.0, gamma shape 4.0.
    pub fn loft() -> RtPreset {
        RtPreset {
            grid: RtGrid::linear(12.0, 1201).expect("grid constants are valid"),
            process_sigma: 0.01,
            serial_interval: 8.0,
            smoothing_window: 7,
            kernel_std: 2.0,
            gamma_alpha: 4.0,
        }
    }

    /// The `ACT_NOW` preset: coarser grid to Rt = 10, fast-moving prior.
    ///
    /// Grid `linspace(0, 10, 501)`, sigma 0.25, serial interval 8.0 days,
    /// window 5, kernel std 5.0, gamma shape 2.5.
    pub fn act_now() -> RtPreset {
        RtPreset {
            grid: RtGrid::linear(10.0, 501).expect("grid constants are valid"),
            process_sigma: 0.25,
            serial_interval: 8.0,
            smoothing_window: 5,
            kernel_std: 5.0,
            gamma_alpha: 2.5,
        }
    }

    /// Resolve a preset by its published name, case-insensitively.
    ///
    /// Returns
    /// -------
    /// PresetResult<RtPreset>
    ///   - `Ok` for `"LOFT"` / `"ACT_NOW"` (any case).
    ///   - `Err(PresetError::UnknownPreset { .. })` otherwise.
    pub fn from_name(name: &str) -> PresetResult<RtPreset> {
        match name.to_uppercase().as_str() {
            "LOFT" => Ok(RtPreset::loft()),
            "ACT_NOW" => Ok(RtPreset::act_now()),
            _ => Err(PresetError::UnknownPreset { name: name.to_string() }),
        }
    }

    /// Copy of this preset with a replaced (validated) process sigma.
    ///
    /// Calibration sweeps candidate sigmas through this without rebuilding
    /// the grid or touching the other hyperparameters.
    pub fn with_process_sigma(&self, process_sigma: f64) -> PresetResult<RtPreset> {
        if !process_sigma.is_finite() || process_sigma <= 0.0 {
            return Err(PresetError::InvalidProcessSigma { value: process_sigma });
        }
        Ok(RtPreset { process_sigma, ..self.clone() })
    }
}

impl Default for RtPreset {
    /// The `LOFT` preset, the original pipeline's primary source.
    fn default() -> RtPreset {
        RtPreset::loft()
    }
}
