//! bayesian — the end-to-end Rt estimation model.
//!
//! Purpose
//! -------
//! Tie the pipeline together behind one type: smooth a raw case series,
//! filter it into daily posteriors, and reduce those to dated credible
//! intervals, while keeping the posterior set around for inspection and
//! calibration.
//!
//! Key behaviors
//! -------------
//! - [`RtModel::run`] executes smooth → filter → extract in order and
//!   returns one [`RtEstimate`] row per surviving day.
//! - The posterior set of the last successful run is cached on the model;
//!   a failed run leaves the previous cache untouched.
//! - The credible mass defaults to [`DEFAULT_CREDIBLE_MASS`] and is
//!   validated once at construction, not on every run.
//!
//! Conventions
//! -----------
//! - The model owns its preset; per-sigma variants for calibration are
//!   built with [`RtPreset::with_process_sigma`] upstream, not by mutating
//!   a model.
//! - A run is single-threaded. Distinct series are independent work items;
//!   the calibration layer scores them in parallel with `rayon`, and
//!   callers with many regions can do the same with one model per series.
//!
//! Downstream usage
//! ----------------
//! - This is the crate's main entry point; the Python bindings wrap an
//!   [`RtModel`] directly.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction defaults, mass validation, an
//!   end-to-end run on constant input, leading-day trimming, error
//!   propagation, and cache semantics across a failed run.
use crate::rt::core::data::CaseSeries;
use crate::rt::core::hdi::{RtEstimate, highest_density_table};
use crate::rt::core::posterior::{RtPosteriors, compute_posteriors};
use crate::rt::core::preset::RtPreset;
use crate::rt::core::smoothing::smooth_cases;
use crate::rt::errors::{RtError, RtResult};

/// Credible mass used when none is given.
pub const DEFAULT_CREDIBLE_MASS: f64 = 0.95;

/// RtModel — smooth, filter, and report Rt for a case series.
///
/// Purpose
/// -------
/// Hold a preset and a credible mass, run the full pipeline on demand, and
/// cache the most recent successful posterior set for follow-up queries
/// (alternative interval masses, likelihood-based calibration).
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use rust_epirt::rt::{CaseSeries, RtModel, RtPreset};
///
/// let start = chrono::NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
/// let cases = CaseSeries::from_start(start, Array1::from_elem(30, 100.0))?;
///
/// let mut model = RtModel::new(RtPreset::act_now());
/// let estimates = model.run(&cases)?;
///
/// assert_eq!(estimates.len(), 30);
/// assert!(estimates.iter().all(|e| e.low <= e.most_likely && e.most_likely <= e.high));
/// # Ok::<(), rust_epirt::rt::RtError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RtModel {
    preset: RtPreset,
    mass: f64,
    posteriors: Option<RtPosteriors>,
}

impl RtModel {
    /// Build a model with the default credible mass.
    ///
    /// Parameters
    /// ----------
    /// - `preset`: `RtPreset`
    ///   Grid and filter configuration to run with.
    ///
    /// Returns
    /// -------
    /// RtModel
    ///   A model with mass [`DEFAULT_CREDIBLE_MASS`] and no cached
    ///   posteriors.
    pub fn new(preset: RtPreset) -> Self {
        RtModel { preset, mass: DEFAULT_CREDIBLE_MASS, posteriors: None }
    }

    /// Build a model with an explicit credible mass.
    ///
    /// Parameters
    /// ----------
    /// - `preset`: `RtPreset`
    ///   Grid and filter configuration to run with.
    /// - `mass`: `f64`
    ///   Credible mass for reported intervals, strictly between 0 and 1.
    ///
    /// Returns
    /// -------
    /// RtResult<RtModel>
    ///   - `Ok(RtModel)` when the mass is valid.
    ///   - `Err(RtError::InvalidCredibleMass { .. })` otherwise, including
    ///     NaN.
    pub fn with_mass(preset: RtPreset, mass: f64) -> RtResult<Self> {
        if !(mass > 0.0 && mass < 1.0) {
            return Err(RtError::InvalidCredibleMass { value: mass });
        }
        Ok(RtModel { preset, mass, posteriors: None })
    }

    /// The preset this model runs with.
    pub fn preset(&self) -> &RtPreset {
        &self.preset
    }

    /// The credible mass reported intervals enclose.
    pub fn credible_mass(&self) -> f64 {
        self.mass
    }

    /// Run the full pipeline on a raw case series.
    ///
    /// ## Steps
    /// 1. Smooth and trim the series ([`smooth_cases`]).
    /// 2. Filter the smoothed counts into daily posteriors
    ///    ([`compute_posteriors`]).
    /// 3. Reduce each posterior to a dated credible interval
    ///    ([`highest_density_table`]).
    ///
    /// Parameters
    /// ----------
    /// - `series`: `&CaseSeries`
    ///   Raw daily case counts on a contiguous calendar.
    ///
    /// Returns
    /// -------
    /// RtResult<Vec<RtEstimate>>
    ///   - `Ok`: one row per day that survives smoothing, in date order.
    ///   - `Err`: the first pipeline failure; the cached posterior set is
    ///     only replaced when the whole run succeeds.
    pub fn run(&mut self, series: &CaseSeries) -> RtResult<Vec<RtEstimate>> {
        let smoothed = smooth_cases(series, &self.preset)?;
        let posteriors = compute_posteriors(&smoothed.smoothed, &self.preset)?;
        let estimates = highest_density_table(&posteriors, self.mass)?;
        self.posteriors = Some(posteriors);
        Ok(estimates)
    }

    /// Posterior set of the last successful [`RtModel::run`], if any.
    pub fn posteriors(&self) -> Option<&RtPosteriors> {
        self.posteriors.as_ref()
    }

    /// Accumulated log-likelihood of the last successful run, if any.
    pub fn log_likelihood(&self) -> Option<f64> {
        self.posteriors.as_ref().map(RtPosteriors::log_likelihood)
    }
}
