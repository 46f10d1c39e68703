//! hdi — highest-density credible intervals over gridded PMFs.
//!
//! Purpose
//! -------
//! Reduce each posterior PMF to a reporting row: the most-likely Rt (the
//! PMF's mode) plus the narrowest grid interval whose enclosed mass exceeds
//! the requested credible mass.
//!
//! Key behaviors
//! -------------
//! - Work directly on cumulative sums: a pair `(low, high)` encloses
//!   `cumulative[high] - cumulative[low]`, which excludes the density at
//!   the low endpoint itself.
//! - Require strictly more than the requested mass, and pick the narrowest
//!   qualifying pair; ties go to the first pair in ascending `(low, high)`
//!   order.
//! - Fail with typed errors instead of sentinel rows: an all-zero or
//!   non-finite PMF is [`RtError::EmptyDistribution`], and a mass no pair
//!   can enclose is [`RtError::IntervalMassUnreachable`] carrying the best
//!   attainable mass.
//! - [`highest_density_table`] maps a full posterior set to dated rows and
//!   stamps the failing day's date onto any per-column error.
//!
//! Invariants & assumptions
//! ------------------------
//! - `pmf` and `grid_values` are index-aligned; the PMF need not be
//!   normalized, but its total mass must be positive and finite.
//! - The mode is the first index of the PMF's maximum, so ties resolve to
//!   the lowest Rt.
//!
//! Conventions
//! -----------
//! - `mass` is a fraction in the open interval (0, 1); 0.95 means a 95%
//!   credible interval.
//!
//! Downstream usage
//! ----------------
//! - The model layer calls [`highest_density_table`] on filter output to
//!   produce the per-day [`RtEstimate`] rows it returns to callers.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the strict-inequality and tie-break semantics on exact
//!   dyadic PMFs, the typed failures, first-mode selection, and date
//!   stamping through the batch path.
use chrono::NaiveDate;
use ndarray::ArrayView1;

use crate::rt::core::posterior::RtPosteriors;
use crate::rt::errors::{RtError, RtResult};

/// One credible interval over the Rt grid, without calendar context.
///
/// Fields
/// ------
/// - `most_likely`: `f64`
///   Grid value at the PMF's first maximum.
/// - `low`: `f64`
///   Grid value at the interval's lower bound.
/// - `high`: `f64`
///   Grid value at the interval's upper bound.
///
/// Invariants
/// ----------
/// - `low <= most_likely <= high` does not hold by construction for
///   arbitrary PMFs, but does for the unimodal posteriors produced by the
///   filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HdiInterval {
    pub most_likely: f64,
    pub low: f64,
    pub high: f64,
}

/// One reporting row: a dated credible interval.
///
/// Fields
/// ------
/// - `date`: `NaiveDate`
///   The day the row describes.
/// - `most_likely`: `f64`
///   Mode of that day's posterior.
/// - `low`: `f64`
///   Lower bound of the credible interval.
/// - `high`: `f64`
///   Upper bound of the credible interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtEstimate {
    pub date: NaiveDate,
    pub most_likely: f64,
    pub low: f64,
    pub high: f64,
}

/// Extract the narrowest credible interval from one gridded PMF.
///
/// Parameters
/// ----------
/// - `pmf`: `ArrayView1<f64>`
///   Density per grid point. Need not be normalized.
/// - `grid_values`: `ArrayView1<f64>`
///   Grid values aligned with `pmf`.
/// - `mass`: `f64`
///   Requested credible mass, strictly between 0 and 1.
///
/// Returns
/// -------
/// RtResult<HdiInterval>
///   - `Ok(HdiInterval)` with the mode and the narrowest pair enclosing
///     strictly more than `mass`.
///   - `Err(RtError::InvalidCredibleMass { .. })` for masses outside
///     (0, 1), including NaN.
///   - `Err(RtError::EmptyDistribution { .. })` when the PMF's total is not
///     strictly positive and finite.
///   - `Err(RtError::IntervalMassUnreachable { .. })` when no pair encloses
///     the requested mass; carries the best attainable enclosed mass.
///
/// Panics
/// ------
/// - If `grid_values` is shorter than `pmf` (the two must be
///   index-aligned).
pub fn highest_density_interval(
    pmf: ArrayView1<f64>, grid_values: ArrayView1<f64>, mass: f64,
) -> RtResult<HdiInterval> {
    if !(mass > 0.0 && mass < 1.0) {
        return Err(RtError::InvalidCredibleMass { value: mass });
    }
    let total = pmf.sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(RtError::EmptyDistribution { date: None, total_mass: total });
    }

    let mut cumulative = Vec::with_capacity(pmf.len());
    let mut running = 0.0;
    for &density in pmf.iter() {
        running += density;
        cumulative.push(running);
    }

    // For each low the first qualifying high is the narrowest, so wider
    // highs never need checking.
    let mut best: Option<(usize, usize)> = None;
    for low in 0..pmf.len() {
        for high in (low + 1)..pmf.len() {
            if cumulative[high] - cumulative[low] > mass {
                let narrower = match best {
                    Some((best_low, best_high)) => high - low < best_high - best_low,
                    None => true,
                };
                if narrower {
                    best = Some((low, high));
                }
                break;
            }
        }
    }

    match best {
        Some((low, high)) => {
            let mut mode_index = 0;
            let mut mode_density = f64::NEG_INFINITY;
            for (index, &density) in pmf.iter().enumerate() {
                if density > mode_density {
                    mode_density = density;
                    mode_index = index;
                }
            }
            Ok(HdiInterval {
                most_likely: grid_values[mode_index],
                low: grid_values[low],
                high: grid_values[high],
            })
        }
        None => Err(RtError::IntervalMassUnreachable {
            date: None,
            requested: mass,
            attainable: cumulative[pmf.len() - 1] - cumulative[0],
        }),
    }
}

/// Extract one dated credible interval per posterior day.
///
/// Parameters
/// ----------
/// - `posteriors`: `&RtPosteriors`
///   Filter output; one PMF column per day.
/// - `mass`: `f64`
///   Requested credible mass, strictly between 0 and 1.
///
/// Returns
/// -------
/// RtResult<Vec<RtEstimate>>
///   - `Ok`: one row per day, in date order.
///   - `Err`: the first failing day's error. Date-stampable failures carry
///     that day's date; mass validation fails before any day is touched
///     and stays undated.
pub fn highest_density_table(posteriors: &RtPosteriors, mass: f64) -> RtResult<Vec<RtEstimate>> {
    let grid = posteriors.grid();
    let mut estimates = Vec::with_capacity(posteriors.len());
    for (day, &date) in posteriors.dates().iter().enumerate() {
        let interval = highest_density_interval(posteriors.pmf_at(day), grid.view(), mass)
            .map_err(|error| error.at_date(date))?;
        estimates.push(RtEstimate {
            date,
            most_likely: interval.most_likely,
            low: interval.low,
            high: interval.high,
        });
    }
    Ok(estimates)
}
