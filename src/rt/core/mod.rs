//! core — shared Rt-estimation data, presets, and pipeline stages.
//!
//! Purpose
//! -------
//! Collect the building blocks of the Rt pipeline: validated case-series
//! containers, grid / preset configuration, Gaussian-kernel smoothing, the
//! Bayesian grid filter, and credible-interval extraction. The model layer
//! composes these stages; nothing in here orchestrates.
//!
//! Key behaviors
//! -------------
//! - Carry daily counts on a contiguous calendar in [`CaseSeries`], with
//!   all input validation at the boundary ([`data`]).
//! - Describe estimation configurations as [`RtPreset`] values over a
//!   validated [`RtGrid`], with the two published presets as constructors
//!   ([`preset`]).
//! - Smooth and trim raw series into filter-ready input via
//!   [`smooth_cases`], producing a [`SmoothedCases`] pair ([`smoothing`]).
//! - Filter smoothed counts into one posterior PMF per day via
//!   [`compute_posteriors`], exposed as [`RtPosteriors`] ([`posterior`]).
//! - Reduce PMFs to credible intervals via [`highest_density_interval`]
//!   and the dated batch form [`highest_density_table`] ([`hdi`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed [`CaseSeries`] is well-formed: dates and counts equal
//!   length and non-empty, counts finite non-negative integers stored as
//!   `f64`, dates strictly consecutive. Later stages rely on this instead
//!   of re-validating.
//! - A constructed [`RtGrid`] starts at 0 and is evenly spaced ascending;
//!   preset scalars are finite and positive (window length at least 1).
//! - Posterior columns are normalized to sum to 1; degenerate arithmetic
//!   surfaces as dated typed errors, never as NaN output.
//!
//! Conventions
//! -----------
//! - Counts are `f64` throughout, integer-valued by validation, matching
//!   the `ndarray` math they feed.
//! - Stages hand each other owned containers; views are used within a
//!   stage only.
//! - This module performs no I/O and no logging.
//!
//! Downstream usage
//! ----------------
//! - [`crate::rt::models::RtModel`] runs smooth → filter → extract over
//!   these stages; calibration re-runs the first two stages per sigma
//!   candidate and reads [`RtPosteriors::log_likelihood`].
//! - Callers wanting intervals at several masses can keep the
//!   [`RtPosteriors`] from a run and call [`highest_density_table`]
//!   directly.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover: series validation and slicing, grid /
//!   preset validation and the published constants, smoothing weights,
//!   centering and trimming, posterior normalization and degeneracy, and
//!   interval semantics including tie-breaks and typed failures.
//! - Integration tests exercise the full pipeline through
//!   [`crate::rt::models::RtModel`].

pub mod data;
pub mod hdi;
pub mod posterior;
pub mod preset;
pub mod smoothing;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::CaseSeries;
pub use self::hdi::{HdiInterval, RtEstimate, highest_density_interval, highest_density_table};
pub use self::posterior::{RtPosteriors, compute_posteriors};
pub use self::preset::{RtGrid, RtPreset};
pub use self::smoothing::{SmoothedCases, smooth_cases};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_epirt::rt::core::prelude::*;
//
// to import the main pipeline-stage surface in a single line.

pub mod prelude {
    pub use super::data::CaseSeries;
    pub use super::hdi::{HdiInterval, RtEstimate, highest_density_interval, highest_density_table};
    pub use super::posterior::{RtPosteriors, compute_posteriors};
    pub use super::preset::{RtGrid, RtPreset};
    pub use super::smoothing::{SmoothedCases, smooth_cases};
}
