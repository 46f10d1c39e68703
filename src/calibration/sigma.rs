//! sigma — maximum-likelihood selection of the drift kernel's sigma.
//!
//! Purpose
//! -------
//! Pick the process sigma that best explains a set of case series: score
//! every candidate by the total filter log-likelihood across all series
//! and keep the candidate with the highest total. This is how the
//! published presets' sigma constants were chosen in the first place; the
//! crate closes that loop so users can recalibrate on their own data.
//!
//! Key behaviors
//! -------------
//! - Build evenly spaced candidate grids with [`sigma_grid`], endpoints
//!   included exactly.
//! - For each candidate, derive a preset variant via
//!   [`RtPreset::with_process_sigma`], run smoothing plus posterior
//!   computation for every series, and sum the per-series
//!   log-likelihoods.
//! - Score series in parallel with `rayon` but collect in input order and
//!   sum sequentially, so results are bitwise deterministic and failures
//!   always report the lowest failing series index.
//! - Return every candidate's score alongside the winner; ties go to the
//!   earliest candidate.
//!
//! Invariants & assumptions
//! ------------------------
//! - Candidates are validated up front: finite and strictly positive, or
//!   the whole run fails with [`CalibrationError::InvalidSigmaCandidate`]
//!   before any estimation starts.
//! - Per-series totals are finite (the filter guarantees finite
//!   log-likelihoods), so score comparisons never meet NaN.
//! - Candidates are scored in input order; the first estimation failure
//!   (lowest candidate index, then lowest series index) aborts the run.
//!
//! Conventions
//! -----------
//! - Verbose progress goes to stderr, one line per scored candidate, and
//!   is off by default ([`CalibrationOptions`]); the library never prints
//!   otherwise.
//!
//! Downstream usage
//! ----------------
//! - Offline calibration jobs run [`select_process_sigma`] over historical
//!   series, then build production presets with
//!   [`RtPreset::with_process_sigma`] using the winner.
//!
//! Testing notes
//! -------------
//! - Unit tests cover grid construction and validation, winner selection
//!   on constant series, score ordering, input validation, failure
//!   wrapping, and run-to-run determinism.
use rayon::prelude::*;

use crate::calibration::errors::{CalResult, CalibrationError};
use crate::rt::core::data::CaseSeries;
use crate::rt::core::posterior::compute_posteriors;
use crate::rt::core::preset::RtPreset;
use crate::rt::core::smoothing::smooth_cases;
use crate::rt::errors::RtResult;

/// Options for a calibration run.
///
/// Fields
/// ------
/// - `verbose`: `bool`
///   When true, print one progress line per scored candidate to stderr.
///   Defaults to false.
#[derive(Debug, Clone, Default)]
pub struct CalibrationOptions {
    pub verbose: bool,
}

/// One candidate's score: the total log-likelihood across all series.
///
/// Fields
/// ------
/// - `sigma`: `f64`
///   The candidate process sigma.
/// - `total_log_likelihood`: `f64`
///   Sum of per-series filter log-likelihoods under this candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmaScore {
    pub sigma: f64,
    pub total_log_likelihood: f64,
}

/// Outcome of a calibration run: the winner plus every candidate's score.
///
/// Fields
/// ------
/// - `best_sigma`: `f64`
///   The candidate with the highest total log-likelihood; ties go to the
///   earliest candidate.
/// - `best_total_log_likelihood`: `f64`
///   The winning total.
/// - `scores`: `Vec<SigmaScore>`
///   One entry per candidate, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaSelection {
    pub best_sigma: f64,
    pub best_total_log_likelihood: f64,
    pub scores: Vec<SigmaScore>,
}

/// Build an evenly spaced candidate grid over `[min, max]`.
///
/// Parameters
/// ----------
/// - `min`: `f64`
///   Smallest candidate; must be finite and strictly positive.
/// - `max`: `f64`
///   Largest candidate; must be finite and at least `min`. Pinned exactly
///   as the last grid entry.
/// - `steps`: `usize`
///   Number of candidates; must be at least 2.
///
/// Returns
/// -------
/// CalResult<Vec<f64>>
///   - `Ok`: `steps` evenly spaced values from `min` to `max` inclusive.
///   - `Err(CalibrationError::NoCandidates)` when `steps < 2`.
///   - `Err(CalibrationError::InvalidSigmaCandidate { .. })` when an
///     endpoint is unusable; the index names the endpoint's grid position.
pub fn sigma_grid(min: f64, max: f64, steps: usize) -> CalResult<Vec<f64>> {
    if steps < 2 {
        return Err(CalibrationError::NoCandidates);
    }
    if !min.is_finite() || min <= 0.0 {
        return Err(CalibrationError::InvalidSigmaCandidate { index: 0, value: min });
    }
    if !max.is_finite() || max < min {
        return Err(CalibrationError::InvalidSigmaCandidate { index: steps - 1, value: max });
    }

    let span = max - min;
    let divisions = (steps - 1) as f64;
    let mut values: Vec<f64> =
        (0..steps).map(|i| min + span * (i as f64) / divisions).collect();
    // Pin the endpoint exactly; the ratio form can land one ulp off.
    if let Some(last) = values.last_mut() {
        *last = max;
    }
    Ok(values)
}

/// Score every candidate sigma and return the maximum-likelihood winner.
///
/// Parameters
/// ----------
/// - `series_set`: `&[CaseSeries]`
///   Raw case series to calibrate against; must be non-empty.
/// - `preset`: `&RtPreset`
///   Base configuration; each candidate replaces only its
///   `process_sigma`.
/// - `sigmas`: `&[f64]`
///   Candidate sigmas; must be non-empty, finite, and strictly positive.
/// - `options`: `&CalibrationOptions`
///   Verbosity switch.
///
/// Returns
/// -------
/// CalResult<SigmaSelection>
///   - `Ok(SigmaSelection)` with per-candidate scores in input order and
///     the earliest highest-scoring candidate as winner.
///   - `Err(CalibrationError::NoCandidates)` / `Err(CalibrationError::NoSeries)`
///     for empty inputs.
///   - `Err(CalibrationError::InvalidSigmaCandidate { .. })` for an
///     unusable candidate, before any estimation runs.
///   - `Err(CalibrationError::EstimationFailed { .. })` when smoothing or
///     filtering fails for some series; reports the lowest failing series
///     index under the first affected candidate.
///
/// Notes
/// -----
/// - Series are scored in parallel, but collection order and the final
///   summation are fixed, so repeated runs produce bitwise identical
///   selections.
pub fn select_process_sigma(
    series_set: &[CaseSeries], preset: &RtPreset, sigmas: &[f64], options: &CalibrationOptions,
) -> CalResult<SigmaSelection> {
    if sigmas.is_empty() {
        return Err(CalibrationError::NoCandidates);
    }
    if series_set.is_empty() {
        return Err(CalibrationError::NoSeries);
    }
    for (index, &value) in sigmas.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(CalibrationError::InvalidSigmaCandidate { index, value });
        }
    }

    let mut scores = Vec::with_capacity(sigmas.len());
    for (index, &sigma) in sigmas.iter().enumerate() {
        let candidate = preset
            .with_process_sigma(sigma)
            .map_err(|_| CalibrationError::InvalidSigmaCandidate { index, value: sigma })?;

        let outcomes: Vec<RtResult<f64>> = series_set
            .par_iter()
            .map(|series| {
                let smoothed = smooth_cases(series, &candidate)?;
                let posteriors = compute_posteriors(&smoothed.smoothed, &candidate)?;
                Ok(posteriors.log_likelihood())
            })
            .collect();

        let mut total_log_likelihood = 0.0;
        for (series_index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(log_likelihood) => total_log_likelihood += log_likelihood,
                Err(error) => {
                    return Err(CalibrationError::EstimationFailed { series_index, error });
                }
            }
        }

        if options.verbose {
            eprintln!("sigma {sigma:.6}: total log-likelihood {total_log_likelihood:.6}");
        }
        scores.push(SigmaScore { sigma, total_log_likelihood });
    }

    let mut best: Option<&SigmaScore> = None;
    for score in &scores {
        let better = match best {
            Some(current) => score.total_log_likelihood > current.total_log_likelihood,
            None => true,
        };
        if better {
            best = Some(score);
        }
    }
    let best = best.ok_or(CalibrationError::NoCandidates)?;
    let (best_sigma, best_total_log_likelihood) = (best.sigma, best.total_log_likelihood);

    Ok(SigmaSelection { best_sigma, best_total_log_likelihood, scores })
}

#[cfg(test)]
mod tests {
    use ndarray::Array1;

    use super::*;
    use crate::rt::errors::RtError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Grid construction: spacing, exact endpoints, and validation.
    // - Winner selection on constant series (small drift should win) with
    //   per-candidate scores in input order.
    // - Input validation order and failure wrapping with series indices.
    // - Run-to-run determinism of the full selection.
    //
    // They intentionally DO NOT cover:
    // - Filter internals (posterior module tests).
    // -------------------------------------------------------------------------

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn constant_series(days: usize) -> CaseSeries {
        CaseSeries::from_start(date(2020, 3, 1), Array1::from_elem(days, 100.0)).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify grid spacing and exact endpoint inclusion.
    //
    // Given
    // -----
    // - A grid request over [0.01, 0.05] with 5 steps.
    //
    // Expect
    // ------
    // - [0.01, 0.02, 0.03, 0.04, 0.05] within 1e-12, with both endpoints
    //   exactly equal to the requested bounds.
    fn sigma_grid_is_evenly_spaced_with_exact_endpoints() {
        // Arrange / Act
        let grid = sigma_grid(0.01, 0.05, 5).unwrap();

        // Assert
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], 0.01);
        assert_eq!(grid[4], 0.05);
        for (index, expected) in [0.01, 0.02, 0.03, 0.04, 0.05].iter().enumerate() {
            assert!((grid[index] - expected).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify grid validation: step counts below 2 and unusable endpoints.
    //
    // Given
    // -----
    // - Requests with 1 step, a zero minimum, and a maximum below the
    //   minimum.
    //
    // Expect
    // ------
    // - `NoCandidates` for the step count; `InvalidSigmaCandidate` naming
    //   the offending endpoint's grid position otherwise.
    fn sigma_grid_validates_steps_and_endpoints() {
        // Arrange / Act / Assert
        assert_eq!(sigma_grid(0.01, 0.05, 1).unwrap_err(), CalibrationError::NoCandidates);
        assert_eq!(
            sigma_grid(0.0, 0.05, 3).unwrap_err(),
            CalibrationError::InvalidSigmaCandidate { index: 0, value: 0.0 }
        );
        assert_eq!(
            sigma_grid(0.05, 0.01, 3).unwrap_err(),
            CalibrationError::InvalidSigmaCandidate { index: 2, value: 0.01 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify winner selection: on constant series the filter's evidence
    // concentrates where the likelihood peaks, so the small-drift
    // candidate must outscore the large-drift one.
    //
    // Given
    // -----
    // - Two 15-day constant series, the ACT_NOW preset, and candidates
    //   [0.01, 0.25].
    //
    // Expect
    // ------
    // - Best sigma 0.01; two scores in input order; the winning total
    //   strictly above the other and equal to the reported best.
    fn select_process_sigma_prefers_small_drift_on_constant_series() {
        // Arrange
        let series_set = vec![constant_series(15), constant_series(15)];
        let candidates = [0.01, 0.25];

        // Act
        let selection = select_process_sigma(
            &series_set,
            &RtPreset::act_now(),
            &candidates,
            &CalibrationOptions::default(),
        )
        .unwrap();

        // Assert
        assert_eq!(selection.best_sigma, 0.01);
        assert_eq!(selection.scores.len(), 2);
        assert_eq!(selection.scores[0].sigma, 0.01);
        assert_eq!(selection.scores[1].sigma, 0.25);
        assert!(
            selection.scores[0].total_log_likelihood > selection.scores[1].total_log_likelihood
        );
        assert_eq!(
            selection.best_total_log_likelihood,
            selection.scores[0].total_log_likelihood
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify input validation: empty candidates, empty series, and an
    // unusable candidate are rejected before any estimation.
    //
    // Given
    // -----
    // - An empty candidate slice, an empty series slice, and a candidate
    //   list containing -1.0.
    //
    // Expect
    // ------
    // - `NoCandidates`, `NoSeries`, and `InvalidSigmaCandidate` naming
    //   index 1 with value -1.0.
    fn select_process_sigma_validates_inputs() {
        // Arrange
        let series_set = vec![constant_series(10)];
        let options = CalibrationOptions::default();

        // Act / Assert
        assert_eq!(
            select_process_sigma(&series_set, &RtPreset::act_now(), &[], &options).unwrap_err(),
            CalibrationError::NoCandidates
        );
        assert_eq!(
            select_process_sigma(&[], &RtPreset::act_now(), &[0.1], &options).unwrap_err(),
            CalibrationError::NoSeries
        );
        assert_eq!(
            select_process_sigma(&series_set, &RtPreset::act_now(), &[0.01, -1.0], &options)
                .unwrap_err(),
            CalibrationError::InvalidSigmaCandidate { index: 1, value: -1.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify failure wrapping: a series that cannot be estimated aborts
    // the run with its position and the underlying error.
    //
    // Given
    // -----
    // - A well-formed series followed by a 5-day all-zero series (fully
    //   trimmed by smoothing), candidate [0.01].
    //
    // Expect
    // ------
    // - `EstimationFailed { series_index: 1 }` wrapping
    //   `InsufficientData { remaining: 0 }`.
    fn select_process_sigma_wraps_failures_with_series_index() {
        // Arrange
        let zeros = CaseSeries::from_start(date(2020, 3, 1), Array1::zeros(5)).unwrap();
        let series_set = vec![constant_series(15), zeros];

        // Act
        let result = select_process_sigma(
            &series_set,
            &RtPreset::act_now(),
            &[0.01],
            &CalibrationOptions::default(),
        );

        // Assert
        assert_eq!(
            result.unwrap_err(),
            CalibrationError::EstimationFailed {
                series_index: 1,
                error: RtError::InsufficientData { remaining: 0 },
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify run-to-run determinism: parallel scoring must not perturb
    // totals or the selection.
    //
    // Given
    // -----
    // - Three constant series and a 4-candidate grid, run twice.
    //
    // Expect
    // ------
    // - Bitwise identical `SigmaSelection` values.
    fn select_process_sigma_is_deterministic_across_runs() {
        // Arrange
        let series_set =
            vec![constant_series(15), constant_series(12), constant_series(20)];
        let candidates = sigma_grid(0.01, 0.3, 4).unwrap();
        let options = CalibrationOptions::default();

        // Act
        let first =
            select_process_sigma(&series_set, &RtPreset::act_now(), &candidates, &options)
                .unwrap();
        let second =
            select_process_sigma(&series_set, &RtPreset::act_now(), &candidates, &options)
                .unwrap();

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // Verify the verbose path completes and reports the same winner as a
    // quiet run.
    //
    // Given
    // -----
    // - One 10-day constant series, candidates [0.01, 0.25], verbose on.
    //
    // Expect
    // ------
    // - `Ok` with best sigma 0.01.
    fn select_process_sigma_runs_verbose() {
        // Arrange
        let series_set = vec![constant_series(10)];
        let options = CalibrationOptions { verbose: true };

        // Act
        let selection =
            select_process_sigma(&series_set, &RtPreset::act_now(), &[0.01, 0.25], &options)
                .unwrap();

        // Assert
        assert_eq!(selection.best_sigma, 0.01);
    }
}
