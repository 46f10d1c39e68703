//! posterior — sequential Bayesian filtering of Rt over a fixed grid.
//!
//! Purpose
//! -------
//! Implement the estimation core: given a smoothed, strictly positive case
//! series and a preset, compute one posterior PMF over the Rt grid per day
//! via the discrete Bayes recurrence, together with the run's accumulated
//! log-likelihood.
//!
//! Key behaviors
//! -------------
//! - Build the day-by-day Poisson likelihood matrix from the expected-case
//!   relation `lambda_t(r) = smoothed[t-1] * exp((r - 1) / serial_interval)`.
//! - Build the Gaussian drift (process) matrix over the grid, each column
//!   renormalized to sum to 1, which lets the posterior "forget" stale
//!   evidence at a rate set by `process_sigma`.
//! - Seed day 0 with a unit-rate Gamma prior restricted to the grid.
//! - Run the normalized recurrence
//!   `posterior_t ∝ likelihood_t ⊙ (P · posterior_{t-1})`, accumulating
//!   `ln(denominator)` per step, and fail fast with a dated
//!   [`RtError::DegenerateLikelihood`] whenever the normalizing denominator
//!   is zero or non-finite.
//!
//! Invariants & assumptions
//! ------------------------
//! - All math stays in linear space; the grids involved are small enough
//!   that underflow shows up as a degenerate denominator, which is surfaced
//!   as a typed error rather than papered over with log-space tricks.
//! - Input series come from the smoother: integer-valued, strictly positive
//!   counts. A zero count reaching this module (only possible by bypassing
//!   the smoother) zeroes the likelihood row and is reported as
//!   `DegenerateLikelihood` on the first affected day, never as NaN output.
//! - Every produced posterior column sums to 1 within numerical tolerance;
//!   [`RtPosteriors`] is read-only after construction.
//!
//! Conventions
//! -----------
//! - `pmfs` has shape `(grid_len, n_days)`; column `t` is day `t`'s PMF and
//!   column 0 is the day-0 prior. Likelihood column `t - 1` belongs to the
//!   transition into day `t`.
//! - The process matrix is indexed `[new, old]` so the drifted prior is the
//!   plain matrix-vector product `P · posterior`.
//!
//! Downstream usage
//! ----------------
//! - The model layer calls [`compute_posteriors`] on smoother output and
//!   hands the result to the interval extractor; calibration reads
//!   [`RtPosteriors::log_likelihood`] to score sigma candidates.
//!
//! Testing notes
//! -------------
//! - Unit tests cover process-matrix column normalization, prior
//!   normalization and degeneracy, likelihood peak placement, posterior
//!   column sums, convergence toward Rt = 1 on constant input, and the dated
//!   degenerate-likelihood failure.
use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1};
use statrs::distribution::{Continuous, Discrete, Gamma, Normal, Poisson};

use crate::rt::core::data::CaseSeries;
use crate::rt::core::preset::RtPreset;
use crate::rt::errors::{RtError, RtResult};

/// RtPosteriors — one posterior PMF over the Rt grid per day.
///
/// Purpose
/// -------
/// Carry the filter's full output: the calendar index, the grid it is
/// defined on, the per-day PMF columns, and the accumulated log-likelihood
/// of the observed transitions. Built by [`compute_posteriors`] and
/// read-only afterwards.
///
/// Invariants
/// ----------
/// - `pmfs.ncols() == dates.len() >= 2`, `pmfs.nrows() == grid.len()`.
/// - Each column is non-negative and sums to 1 within numerical tolerance.
/// - `log_likelihood` is finite and accumulates `dates.len() - 1`
///   transition terms.
#[derive(Debug, Clone, PartialEq)]
pub struct RtPosteriors {
    dates: Vec<NaiveDate>,
    grid: Array1<f64>,
    pmfs: Array2<f64>,
    log_likelihood: f64,
}

impl RtPosteriors {
    /// Calendar index, one entry per posterior column.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The Rt grid the PMFs are defined on.
    pub fn grid(&self) -> &Array1<f64> {
        &self.grid
    }

    /// All PMF columns, shape `(grid_len, n_days)`.
    pub fn pmfs(&self) -> &Array2<f64> {
        &self.pmfs
    }

    /// Day `day`'s PMF as a view (0-based).
    pub fn pmf_at(&self, day: usize) -> ArrayView1<'_, f64> {
        self.pmfs.column(day)
    }

    /// Accumulated `ln(denominator)` over all transitions.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Number of days (posterior columns).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table has no days (never true for constructed values).
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Run the Bayesian filter over a smoothed series.
///
/// Parameters
/// ----------
/// - `smoothed`: `&CaseSeries`
///   Smoother output: integer-valued, strictly positive daily counts. See
///   the module notes for what happens when a zero sneaks in.
/// - `preset`: `&RtPreset`
///   Supplies the grid, `process_sigma`, `serial_interval`, and
///   `gamma_alpha`.
///
/// Returns
/// -------
/// RtResult<RtPosteriors>
///   - `Ok(RtPosteriors)` with one normalized PMF column per input day.
///   - `Err(RtError::InsufficientData { .. })` for series shorter than 2
///     days (no transition to filter over).
///   - `Err(RtError::DegenerateLikelihood { date })` when a normalizing
///     denominator is zero or non-finite; `date` is the first affected day.
///   - `Err(RtError::DegeneratePrior { .. })` when the Gamma prior has no
///     mass on the grid.
///
/// Notes
/// -----
/// - The accumulated log-likelihood is the filter's model evidence up to a
///   constant and is what calibration maximizes across sigma candidates.
pub fn compute_posteriors(smoothed: &CaseSeries, preset: &RtPreset) -> RtResult<RtPosteriors> {
    if smoothed.len() < 2 {
        return Err(RtError::InsufficientData { remaining: smoothed.len() });
    }
    let grid = preset.grid.values();
    let likelihoods = likelihood_matrix(smoothed, grid, preset.serial_interval)?;
    let process = process_matrix(grid, preset.process_sigma)?;
    let prior0 = day_zero_prior(grid, preset.gamma_alpha)?;

    let n_days = smoothed.len();
    let mut pmfs = Array2::zeros((grid.len(), n_days));
    pmfs.column_mut(0).assign(&prior0);

    let mut log_likelihood = 0.0;
    for t in 1..n_days {
        let drifted = process.dot(&pmfs.column(t - 1));
        let numerator = &likelihoods.column(t - 1) * &drifted;
        let denominator = numerator.sum();
        if !denominator.is_finite() || denominator <= 0.0 {
            return Err(RtError::DegenerateLikelihood { date: smoothed.dates[t] });
        }
        pmfs.column_mut(t).assign(&(numerator / denominator));
        log_likelihood += denominator.ln();
    }

    Ok(RtPosteriors {
        dates: smoothed.dates.clone(),
        grid: grid.clone(),
        pmfs,
        log_likelihood,
    })
}

/// Poisson likelihood of each observed day under each candidate Rt.
///
/// Column `t - 1` holds, for every grid entry `r`, the PMF of observing
/// `smoothed[t]` cases given the rate implied by yesterday's count and `r`.
/// Rates that are not strictly positive contribute zero likelihood.
fn likelihood_matrix(
    smoothed: &CaseSeries, grid: &Array1<f64>, serial_interval: f64,
) -> RtResult<Array2<f64>> {
    let growth = grid.mapv(|r| ((r - 1.0) / serial_interval).exp());
    let n_days = smoothed.len();

    let mut likelihoods = Array2::zeros((grid.len(), n_days - 1));
    for t in 1..n_days {
        let previous = smoothed.counts[t - 1];
        let observed = smoothed.counts[t] as u64;
        let mut column = likelihoods.column_mut(t - 1);
        for (row, &factor) in growth.iter().enumerate() {
            let rate = previous * factor;
            column[row] = if rate > 0.0 { Poisson::new(rate)?.pmf(observed) } else { 0.0 };
        }
    }
    Ok(likelihoods)
}

/// Gaussian drift matrix over the grid, columns normalized to sum to 1.
///
/// Entry `[new, old]` is the Normal(grid[old], sigma) density at grid[new],
/// so `P · posterior` spreads yesterday's belief before today's evidence is
/// applied. The diagonal density is always positive, so column sums are too.
fn process_matrix(grid: &Array1<f64>, sigma: f64) -> RtResult<Array2<f64>> {
    let mut process = Array2::zeros((grid.len(), grid.len()));
    for (col, &old) in grid.iter().enumerate() {
        let kernel = Normal::new(old, sigma)?;
        let mut column = process.column_mut(col);
        for (row, &new) in grid.iter().enumerate() {
            column[row] = kernel.pdf(new);
        }
        let total = column.sum();
        column /= total;
    }
    Ok(process)
}

/// Unit-rate Gamma prior restricted to the grid and normalized to sum to 1.
fn day_zero_prior(grid: &Array1<f64>, gamma_alpha: f64) -> RtResult<Array1<f64>> {
    let prior = Gamma::new(gamma_alpha, 1.0)?;
    let mut density = grid.mapv(|r| prior.pdf(r));
    let total = density.sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(RtError::DegeneratePrior { gamma_alpha });
    }
    density /= total;
    Ok(density)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::rt::core::preset::RtGrid;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Process-matrix column normalization and peak placement.
    // - Day-0 prior normalization, zero mass at Rt = 0, and degeneracy.
    // - Likelihood peak placement for a known growth step.
    // - Posterior column sums, convergence toward Rt = 1 on constant input,
    //   and the finite negative log-likelihood.
    // - Dated degenerate-likelihood and short-series failures.
    //
    // They intentionally DO NOT cover:
    // - Interval extraction on the posterior columns (hdi module).
    // - Full pipeline runs (integration tests).
    // -------------------------------------------------------------------------

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn smoothed(counts: Array1<f64>) -> CaseSeries {
        CaseSeries::from_start(date(2020, 3, 1), counts).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that every process-matrix column sums to 1 and peaks on the
    // diagonal (the drift kernel is centered on the old value).
    //
    // Given
    // -----
    // - An 11-point grid over [0, 1] and sigma 0.2.
    //
    // Expect
    // ------
    // - Column sums within 1e-12 of 1; each column's maximum on its
    //   diagonal entry; all entries non-negative.
    fn process_matrix_columns_are_normalized_and_peak_on_diagonal() {
        // Arrange
        let grid = RtGrid::linear(1.0, 11).unwrap();

        // Act
        let process = process_matrix(grid.values(), 0.2).unwrap();

        // Assert
        for col in 0..11 {
            let column = process.column(col);
            assert!((column.sum() - 1.0).abs() < 1e-12, "column {col} should sum to 1");
            let max = column.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(column[col], max, "column {col} should peak on the diagonal");
            assert!(column.iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify day-0 prior normalization and that Rt = 0 carries no prior
    // mass for shapes above 1.
    //
    // Given
    // -----
    // - The LOFT grid and gamma shape 4.
    //
    // Expect
    // ------
    // - Prior sums to 1 within 1e-12 and prior[0] == 0.
    fn day_zero_prior_is_normalized_with_no_mass_at_zero() {
        // Arrange
        let grid = RtGrid::linear(12.0, 1201).unwrap();

        // Act
        let prior = day_zero_prior(grid.values(), 4.0).unwrap();

        // Assert
        assert!((prior.sum() - 1.0).abs() < 1e-12);
        assert_eq!(prior[0], 0.0);
        assert!(prior.iter().all(|&p| p >= 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify the degenerate-prior failure when the Gamma density underflows
    // everywhere on the grid.
    //
    // Given
    // -----
    // - A grid capped at 10 and gamma shape 500 (mean far off-grid).
    //
    // Expect
    // ------
    // - `Err(RtError::DegeneratePrior { gamma_alpha: 500.0 })`.
    fn day_zero_prior_fails_when_density_underflows_off_grid() {
        // Arrange
        let grid = RtGrid::linear(10.0, 501).unwrap();

        // Act
        let result = day_zero_prior(grid.values(), 500.0);

        // Assert
        assert_eq!(result.unwrap_err(), RtError::DegeneratePrior { gamma_alpha: 500.0 });
    }

    #[test]
    // Purpose
    // -------
    // Verify likelihood peak placement: a 100 → 150 step should be most
    // likely at the Rt whose implied rate equals the observation.
    //
    // Given
    // -----
    // - Smoothed counts [100, 150], the LOFT grid, serial interval 8.
    //
    // Expect
    // ------
    // - The likelihood column peaks at grid value
    //   1 + 8 ln(1.5) ≈ 4.2439, i.e. grid point 4.24.
    fn likelihood_matrix_peaks_at_growth_implied_rt() {
        // Arrange
        let series = smoothed(array![100.0, 150.0]);
        let grid = RtGrid::linear(12.0, 1201).unwrap();

        // Act
        let likelihoods = likelihood_matrix(&series, grid.values(), 8.0).unwrap();

        // Assert
        let column = likelihoods.column(0);
        let argmax = column
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!((grid.values()[argmax] - 4.24).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify posterior normalization and convergence on constant input:
    // with no growth, belief should concentrate at Rt = 1.
    //
    // Given
    // -----
    // - 15 days of smoothed count 100, ACT_NOW preset.
    //
    // Expect
    // ------
    // - Every posterior column sums to 1 within 1e-9; the final column's
    //   argmax is within 0.05 of Rt = 1; the log-likelihood is finite and
    //   negative; dates and grid are carried through.
    fn compute_posteriors_concentrates_at_one_for_constant_series() {
        // Arrange
        let series = smoothed(Array1::from_elem(15, 100.0));
        let preset = RtPreset::act_now();

        // Act
        let posteriors = compute_posteriors(&series, &preset).unwrap();

        // Assert
        assert_eq!(posteriors.len(), 15);
        assert_eq!(posteriors.dates(), &series.dates[..]);
        assert_eq!(posteriors.grid(), preset.grid.values());
        for day in 0..posteriors.len() {
            let column = posteriors.pmf_at(day);
            assert!((column.sum() - 1.0).abs() < 1e-9, "day {day} should be normalized");
        }
        let last = posteriors.pmf_at(14);
        let argmax = last
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!((posteriors.grid()[argmax] - 1.0).abs() <= 0.05);
        assert!(posteriors.log_likelihood().is_finite());
        assert!(posteriors.log_likelihood() < 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the dated degenerate-likelihood failure when a zero count
    // reaches the engine directly (bypassing the smoother).
    //
    // Given
    // -----
    // - Smoothed counts [5, 0, 5] starting 2020-03-01, ACT_NOW preset. The
    //   zero on day 1 is a valid *observation* (Poisson PMF at 0 is
    //   positive) but zeroes every rate for the transition into day 2.
    //
    // Expect
    // ------
    // - `Err(RtError::DegenerateLikelihood { date: 2020-03-03 })`.
    fn compute_posteriors_reports_degenerate_likelihood_with_date() {
        // Arrange
        let series = smoothed(array![5.0, 0.0, 5.0]);
        let preset = RtPreset::act_now();

        // Act
        let result = compute_posteriors(&series, &preset);

        // Assert
        assert_eq!(
            result.unwrap_err(),
            RtError::DegenerateLikelihood { date: date(2020, 3, 3) }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that series with fewer than 2 days are rejected before any
    // filtering.
    //
    // Given
    // -----
    // - A 1-day smoothed series.
    //
    // Expect
    // ------
    // - `Err(RtError::InsufficientData { remaining: 1 })`.
    fn compute_posteriors_rejects_single_day_series() {
        // Arrange
        let series = smoothed(array![100.0]);
        let preset = RtPreset::act_now();

        // Act
        let result = compute_posteriors(&series, &preset);

        // Assert
        assert_eq!(result.unwrap_err(), RtError::InsufficientData { remaining: 1 });
    }
}
