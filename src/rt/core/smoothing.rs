//! smoothing — Gaussian-kernel smoothing and zero-trimming of case series.
//!
//! Purpose
//! -------
//! Turn a noisy daily case series into the integer-valued, strictly positive
//! series the posterior engine needs: apply a centered Gaussian-weighted
//! moving average, round to whole cases, and drop the unusable prefix that
//! ends at the latest zero-valued smoothed day.
//!
//! Key behaviors
//! -------------
//! - Smooth with a fixed-width window whose slot weights follow a Gaussian
//!   profile; at the series edges the window truncates to the available
//!   observations (minimum 1) and the weighted mean renormalizes over the
//!   present slots.
//! - Round smoothed values to the nearest whole case, ties to even, then
//!   clamp at zero.
//! - Trim both the original and smoothed series through the latest
//!   zero-valued smoothed day, keeping the two aligned; a series with no
//!   zero-valued smoothed day passes through untrimmed.
//! - Fail with [`RtError::InsufficientData`] when fewer than 2 days survive.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input series are validated [`CaseSeries`] values (finite, non-negative,
//!   integer counts; contiguous dates).
//! - Output smoothed counts are integer-valued and strictly positive, which
//!   makes them admissible as Poisson outcomes and rates downstream.
//! - `original` and `smoothed` in the result share dates and length.
//!
//! Conventions
//! -----------
//! - For window width W the label sits `(W - 1) / 2` slots from the window
//!   start (integer division), so odd windows are symmetric and even windows
//!   look one extra day into the past.
//! - Weights use the Gaussian profile `exp(-0.5 ((i - (W-1)/2) / std)^2)`
//!   over window slots `i`, the standard fixed-window Gaussian taper.
//!
//! Downstream usage
//! ----------------
//! - The model layer calls [`smooth_cases`] and feeds `smoothed` to the
//!   posterior engine, carrying `original` alongside for reporting.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constant-series invariance (including edges), a
//!   hand-computed growth scenario with a trimmed leading zero, interior-zero
//!   trimming, even-window centering, the raw weighted mean against
//!   closed-form values, and the insufficient-data failure.
use ndarray::{Array1, ArrayView1, s};

use crate::rt::core::data::CaseSeries;
use crate::rt::core::preset::RtPreset;
use crate::rt::errors::{RtError, RtResult};

/// SmoothedCases — aligned original and smoothed series after trimming.
///
/// Produced only by [`smooth_cases`]; both members share dates and length,
/// and every smoothed count is a strictly positive whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedCases {
    /// Trimmed original counts, aligned with `smoothed`.
    pub original: CaseSeries,
    /// Trimmed smoothed counts, integer-valued and strictly positive.
    pub smoothed: CaseSeries,
}

/// Smooth a case series and trim it through the latest zero-valued day.
///
/// Parameters
/// ----------
/// - `series`: `&CaseSeries`
///   Validated daily new-case counts.
/// - `preset`: `&RtPreset`
///   Supplies `smoothing_window` (width in days) and `kernel_std`.
///
/// Returns
/// -------
/// RtResult<SmoothedCases>
///   - `Ok(SmoothedCases)` with aligned, trimmed original/smoothed series.
///   - `Err(RtError::InsufficientData { remaining })` when fewer than 2 days
///     survive the trim (for example, an all-zero series).
///
/// Notes
/// -----
/// - Rounding is ties-to-even, matching the original pipeline's NumPy
///   rounding, then clamped at zero. With non-negative inputs and strictly
///   positive weights the clamp never fires; it makes the non-negativity
///   invariant local instead of inherited.
/// - Trimming scans for the latest zero anywhere in the smoothed series, not
///   just a leading run: every day at or before it would hand the posterior
///   engine a zero rate or zero observation.
pub fn smooth_cases(series: &CaseSeries, preset: &RtPreset) -> RtResult<SmoothedCases> {
    let weights = kernel_weights(preset.smoothing_window, preset.kernel_std);
    let means = weighted_rolling_mean(series.counts.view(), weights.view());
    let rounded = means.mapv(|value| value.round_ties_even().max(0.0));

    let start = match latest_zero(rounded.view()) {
        Some(index) => index + 1,
        None => 0,
    };
    let remaining = series.len() - start;
    if remaining < 2 {
        return Err(RtError::InsufficientData { remaining });
    }

    let original = series.tail(start);
    let smoothed = CaseSeries {
        dates: original.dates.clone(),
        counts: rounded.slice(s![start..]).to_owned(),
    };
    Ok(SmoothedCases { original, smoothed })
}

/// Gaussian taper over the window slots.
#[inline]
fn kernel_weights(window: usize, std: f64) -> Array1<f64> {
    let center = (window as f64 - 1.0) / 2.0;
    Array1::from_iter((0..window).map(|i| (-0.5 * ((i as f64 - center) / std).powi(2)).exp()))
}

/// Centered weighted moving average with edge renormalization.
///
/// For label `t` the window covers series indices
/// `t + offset - (W - 1) ..= t + offset` with `offset = (W - 1) / 2`;
/// out-of-range slots drop out and the mean renormalizes over the weights
/// actually present. The label index itself is always present, so every
/// output entry is defined.
#[inline]
fn weighted_rolling_mean(counts: ArrayView1<f64>, weights: ArrayView1<f64>) -> Array1<f64> {
    let n = counts.len();
    let window = weights.len();
    let offset = (window - 1) / 2;

    let mut means = Array1::zeros(n);
    for t in 0..n {
        let window_start = t as isize + offset as isize - (window as isize - 1);
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (slot, &weight) in weights.iter().enumerate() {
            let index = window_start + slot as isize;
            if index < 0 || index >= n as isize {
                continue;
            }
            numerator += weight * counts[index as usize];
            denominator += weight;
        }
        means[t] = numerator / denominator;
    }
    means
}

/// Index of the latest zero-valued entry, if any.
#[inline]
fn latest_zero(smoothed: ArrayView1<f64>) -> Option<usize> {
    (0..smoothed.len()).rev().find(|&index| smoothed[index] == 0.0)
}
