//! data — validated daily case-count series for Rt estimation.
//!
//! Purpose
//! -------
//! Provide the input container for the Rt estimation stack: a daily series of
//! new confirmed cases indexed by calendar date. Validation happens once, at
//! construction, so the smoother and posterior engine can assume well-formed
//! inputs throughout.
//!
//! Key behaviors
//! -------------
//! - Construct [`CaseSeries`] values from an explicit date index plus counts
//!   ([`CaseSeries::new`]) or from a start date with generated contiguous
//!   dates ([`CaseSeries::from_start`]).
//! - Reject empty series, length mismatches, non-finite / negative /
//!   fractional counts, and date indices with gaps or reordering, via typed
//!   [`RtError`] values instead of panicking.
//! - Slice an owned suffix with [`CaseSeries::tail`], preserving the
//!   date/count alignment (used by zero-trimming in the smoother).
//!
//! Invariants & assumptions
//! ------------------------
//! - `dates.len() == counts.len() > 0` for every constructed value.
//! - Every count is finite, ≥ 0, and integer-valued; counts are stored as
//!   `f64` because downstream likelihood code evaluates Poisson PMFs on them.
//! - Dates advance exactly one calendar day per step; reporting gaps are a
//!   data-preparation concern and are rejected here, not repaired.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; index 0 holds the oldest day.
//! - Fields are public in the validated-container style: constructors
//!   enforce the invariants, downstream code reads fields directly.
//!
//! Downstream usage
//! ----------------
//! - The smoother consumes a [`CaseSeries`] and produces an aligned smoothed
//!   copy; the posterior engine consumes the smoothed series; the model layer
//!   wires the two together.
//! - Python bindings build [`CaseSeries`] values from a start date plus a
//!   NumPy array via [`CaseSeries::from_start`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor acceptance, each rejection path with its
//!   first offending index, contiguous date generation, and `tail` alignment.
use chrono::NaiveDate;
use ndarray::{Array1, s};

use crate::rt::errors::{RtError, RtResult};

/// CaseSeries — daily new-case counts with a contiguous date index.
///
/// Purpose
/// -------
/// Carry one region's daily case counts through the estimation pipeline with
/// the date bookkeeping attached, so downstream artifacts (smoothed series,
/// posterior tables, interval rows) can be keyed by calendar day.
///
/// Fields
/// ------
/// - `dates`: `Vec<NaiveDate>`
///   Calendar index, oldest first, one entry per day with no gaps.
/// - `counts`: `Array1<f64>`
///   New confirmed cases per day; finite, ≥ 0, integer-valued.
///
/// Invariants
/// ----------
/// - `dates.len() == counts.len() > 0`.
/// - `dates[i + 1]` is exactly one day after `dates[i]`.
/// - `counts[i].fract() == 0.0`, `counts[i] >= 0.0`, finite.
///
/// Notes
/// -----
/// - Counts live in `f64` (not an integer type) because every consumer is
///   floating-point: Gaussian-kernel means, Poisson rates, PMF lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSeries {
    /// Calendar index, oldest first, contiguous.
    pub dates: Vec<NaiveDate>,
    /// New confirmed cases per day.
    pub counts: Array1<f64>,
}

impl CaseSeries {
    /// Construct a validated series from an explicit date index and counts.
    ///
    /// Parameters
    /// ----------
    /// - `dates`: `Vec<NaiveDate>`
    ///   Calendar index, oldest first. Must advance one day per entry.
    /// - `counts`: `Array1<f64>`
    ///   Daily new-case counts aligned with `dates`.
    ///
    /// Returns
    /// -------
    /// RtResult<CaseSeries>
    ///   - `Ok(CaseSeries)` when all invariants hold.
    ///   - `Err(RtError::LengthMismatch { .. })` when the index and counts
    ///     disagree in length.
    ///   - `Err(RtError::EmptySeries)` for zero-length input.
    ///   - `Err(RtError::NonFiniteCount { .. })`,
    ///     `Err(RtError::NegativeCount { .. })`, or
    ///     `Err(RtError::NonIntegerCount { .. })` for the first offending
    ///     count.
    ///   - `Err(RtError::NonContiguousDates { .. })` for the first date pair
    ///     that is not exactly one day apart (covers both gaps and
    ///     reordering).
    pub fn new(dates: Vec<NaiveDate>, counts: Array1<f64>) -> RtResult<CaseSeries> {
        if dates.len() != counts.len() {
            return Err(RtError::LengthMismatch { dates: dates.len(), counts: counts.len() });
        }
        if counts.is_empty() {
            return Err(RtError::EmptySeries);
        }
        for (index, &value) in counts.iter().enumerate() {
            if !value.is_finite() {
                return Err(RtError::NonFiniteCount { index, value });
            }
            if value < 0.0 {
                return Err(RtError::NegativeCount { index, value });
            }
            if value.fract() != 0.0 {
                return Err(RtError::NonIntegerCount { index, value });
            }
        }
        for pair in dates.windows(2) {
            if pair[0].succ_opt() != Some(pair[1]) {
                return Err(RtError::NonContiguousDates { prev: pair[0], next: pair[1] });
            }
        }
        Ok(CaseSeries { dates, counts })
    }

    /// Construct a series from a start date, generating the contiguous index.
    ///
    /// Parameters
    /// ----------
    /// - `start`: `NaiveDate`
    ///   Date of `counts[0]`; subsequent entries are consecutive days.
    /// - `counts`: `Array1<f64>`
    ///   Daily new-case counts.
    ///
    /// Returns
    /// -------
    /// RtResult<CaseSeries>
    ///   Same count-validation failures as [`CaseSeries::new`]; the generated
    ///   index cannot itself be malformed.
    ///
    /// Panics
    /// ------
    /// - If the generated index would overflow the calendar range supported
    ///   by `chrono` (several hundred thousand years out), which indicates a
    ///   programming error rather than bad data.
    pub fn from_start(start: NaiveDate, counts: Array1<f64>) -> RtResult<CaseSeries> {
        let dates = (0..counts.len())
            .map(|offset| start + chrono::Days::new(offset as u64))
            .collect::<Vec<_>>();
        CaseSeries::new(dates, counts)
    }

    /// Number of days in the series.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the series holds no days (never true for validated values).
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Owned suffix starting at `start` (0-based), alignment preserved.
    ///
    /// A suffix of a contiguous series is itself contiguous, so no
    /// re-validation happens. `start == len()` yields an empty pair of
    /// buffers; callers that require a minimum surviving length check it
    /// themselves.
    pub fn tail(&self, start: usize) -> CaseSeries {
        CaseSeries {
            dates: self.dates[start..].to_vec(),
            counts: self.counts.slice(s![start..]).to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constructor acceptance of well-formed series.
    // - Each rejection path (empty, mismatch, non-finite, negative,
    //   fractional, gapped/reordered dates) with its payload.
    // - Contiguous index generation via `from_start`.
    // - Suffix slicing via `tail`.
    //
    // They intentionally DO NOT cover:
    // - Smoothing or posterior behavior on the data (covered in their own
    //   modules and in the integration tests).
    // -------------------------------------------------------------------------

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that a well-formed series passes validation and preserves its
    // buffers.
    //
    // Given
    // -----
    // - Three consecutive dates and three whole-number counts.
    //
    // Expect
    // ------
    // - `Ok` with the same dates and counts.
    fn case_series_new_accepts_contiguous_whole_counts() {
        // Arrange
        let dates = vec![date(2020, 3, 1), date(2020, 3, 2), date(2020, 3, 3)];
        let counts = array![0.0, 5.0, 12.0];

        // Act
        let series = CaseSeries::new(dates.clone(), counts.clone()).unwrap();

        // Assert
        assert_eq!(series.dates, dates);
        assert_eq!(series.counts, counts);
        assert_eq!(series.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an empty series is rejected.
    //
    // Given
    // -----
    // - Zero dates and zero counts.
    //
    // Expect
    // ------
    // - `Err(RtError::EmptySeries)`.
    fn case_series_new_returns_error_for_empty_series() {
        // Arrange
        let dates: Vec<NaiveDate> = Vec::new();
        let counts: Array1<f64> = array![];

        // Act
        let result = CaseSeries::new(dates, counts);

        // Assert
        assert_eq!(result.unwrap_err(), RtError::EmptySeries);
    }

    #[test]
    // Purpose
    // -------
    // Verify that mismatched index/count lengths are rejected with both
    // lengths reported.
    //
    // Given
    // -----
    // - Two dates but three counts.
    //
    // Expect
    // ------
    // - `Err(RtError::LengthMismatch { dates: 2, counts: 3 })`.
    fn case_series_new_returns_error_for_length_mismatch() {
        // Arrange
        let dates = vec![date(2020, 3, 1), date(2020, 3, 2)];
        let counts = array![1.0, 2.0, 3.0];

        // Act
        let result = CaseSeries::new(dates, counts);

        // Assert
        assert_eq!(result.unwrap_err(), RtError::LengthMismatch { dates: 2, counts: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Verify that the first non-finite count is reported with its index.
    //
    // Given
    // -----
    // - A series whose second count is NaN.
    //
    // Expect
    // ------
    // - `Err(RtError::NonFiniteCount { index: 1, .. })`.
    fn case_series_new_returns_error_for_non_finite_count() {
        // Arrange
        let counts = array![1.0, f64::NAN, 3.0];

        // Act
        let result = CaseSeries::from_start(date(2020, 3, 1), counts);

        // Assert
        match result.unwrap_err() {
            RtError::NonFiniteCount { index, value } => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("Expected NonFiniteCount, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that negative counts are rejected with index and value.
    //
    // Given
    // -----
    // - A series whose third count is -2.
    //
    // Expect
    // ------
    // - `Err(RtError::NegativeCount { index: 2, value: -2.0 })`.
    fn case_series_new_returns_error_for_negative_count() {
        // Arrange
        let counts = array![1.0, 2.0, -2.0];

        // Act
        let result = CaseSeries::from_start(date(2020, 3, 1), counts);

        // Assert
        assert_eq!(result.unwrap_err(), RtError::NegativeCount { index: 2, value: -2.0 });
    }

    #[test]
    // Purpose
    // -------
    // Verify that fractional counts are rejected; case counts are whole
    // numbers by definition.
    //
    // Given
    // -----
    // - A series whose first count is 0.5.
    //
    // Expect
    // ------
    // - `Err(RtError::NonIntegerCount { index: 0, value: 0.5 })`.
    fn case_series_new_returns_error_for_fractional_count() {
        // Arrange
        let counts = array![0.5, 2.0];

        // Act
        let result = CaseSeries::from_start(date(2020, 3, 1), counts);

        // Assert
        assert_eq!(result.unwrap_err(), RtError::NonIntegerCount { index: 0, value: 0.5 });
    }

    #[test]
    // Purpose
    // -------
    // Verify that a gapped date index is rejected at the first bad pair.
    //
    // Given
    // -----
    // - Dates 2020-03-01, 2020-03-02, 2020-03-04 (03-03 missing).
    //
    // Expect
    // ------
    // - `Err(RtError::NonContiguousDates)` naming 03-02 and 03-04.
    fn case_series_new_returns_error_for_gapped_dates() {
        // Arrange
        let dates = vec![date(2020, 3, 1), date(2020, 3, 2), date(2020, 3, 4)];
        let counts = array![1.0, 2.0, 3.0];

        // Act
        let result = CaseSeries::new(dates, counts);

        // Assert
        assert_eq!(
            result.unwrap_err(),
            RtError::NonContiguousDates { prev: date(2020, 3, 2), next: date(2020, 3, 4) }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that descending dates are rejected through the same contiguity
    // check as gaps.
    //
    // Given
    // -----
    // - Dates 2020-03-02 followed by 2020-03-01.
    //
    // Expect
    // ------
    // - `Err(RtError::NonContiguousDates)`.
    fn case_series_new_returns_error_for_descending_dates() {
        // Arrange
        let dates = vec![date(2020, 3, 2), date(2020, 3, 1)];
        let counts = array![1.0, 2.0];

        // Act
        let result = CaseSeries::new(dates, counts);

        // Assert
        assert_eq!(
            result.unwrap_err(),
            RtError::NonContiguousDates { prev: date(2020, 3, 2), next: date(2020, 3, 1) }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `from_start` generates a contiguous index spanning month
    // boundaries.
    //
    // Given
    // -----
    // - Start date 2020-02-28 (leap year) and three counts.
    //
    // Expect
    // ------
    // - Dates 02-28, 02-29, 03-01.
    fn case_series_from_start_generates_contiguous_dates() {
        // Arrange
        let counts = array![1.0, 2.0, 3.0];

        // Act
        let series = CaseSeries::from_start(date(2020, 2, 28), counts).unwrap();

        // Assert
        assert_eq!(series.dates, vec![date(2020, 2, 28), date(2020, 2, 29), date(2020, 3, 1)]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `tail` keeps dates and counts aligned.
    //
    // Given
    // -----
    // - A 4-day series, sliced from index 2.
    //
    // Expect
    // ------
    // - A 2-day series holding the last two dates and counts.
    fn case_series_tail_preserves_alignment() {
        // Arrange
        let series = CaseSeries::from_start(date(2020, 3, 1), array![1.0, 2.0, 3.0, 4.0]).unwrap();

        // Act
        let tail = series.tail(2);

        // Assert
        assert_eq!(tail.dates, vec![date(2020, 3, 3), date(2020, 3, 4)]);
        assert_eq!(tail.counts, array![3.0, 4.0]);
    }
}
