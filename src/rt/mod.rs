//! rt — Bayesian Rt estimation stack: core stages, models, and errors.
//!
//! Purpose
//! -------
//! Provide a cohesive effective-reproduction-number (Rt) layer that bundles
//! validated case-series containers, grid presets, the smoothing /
//! filtering / interval-extraction stages, a user-facing model, and shared
//! error types under a single namespace. This is the surface most
//! consumers (including Python bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect the pipeline stages in [`core`]: case-series data, grid /
//!   preset configuration, Gaussian smoothing, the Bayesian grid filter,
//!   and highest-density-interval extraction.
//! - Expose the end-to-end API in [`models`] via [`RtModel`]: one `run`
//!   call from raw counts to dated [`RtEstimate`] rows, with the posterior
//!   set cached for inspection.
//! - Centralize Rt-specific error types in [`errors`] ([`RtError`],
//!   [`PresetError`], and the [`RtResult`] / [`PresetResult`] aliases) so
//!   callers see a uniform error surface across the stack.
//! - Re-export the everyday types directly from this module and via
//!   [`prelude`] for ergonomic imports in downstream crates and bindings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Case data are carried in validated [`CaseSeries`] instances: finite,
//!   non-negative, integer-valued counts on strictly consecutive dates.
//! - Presets are validated at construction; the two published
//!   configurations are available as [`RtPreset::loft`] and
//!   [`RtPreset::act_now`] or by name via [`RtPreset::from_name`].
//! - Posterior PMF columns sum to 1; numerical degeneracy surfaces as
//!   dated typed errors rather than NaN output.
//! - Estimation is deterministic: the same series, preset, and mass always
//!   produce identical output.
//!
//! Conventions
//! -----------
//! - Rt values live on a fixed evenly spaced grid starting at 0; credible
//!   masses are fractions in the open interval (0, 1).
//! - The stack performs no I/O and no logging; callers orchestrate data
//!   loading and reporting. Error conditions are surfaced as [`RtResult`]
//!   and, at the calibration layer, wrapped into calibration errors.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Construct a [`CaseSeries`] from dated counts (or a start date via
//!      [`CaseSeries::from_start`]).
//!   2. Pick an [`RtPreset`] and build an [`RtModel`] via `new` or
//!      `with_mass`.
//!   3. Call `run` to get one dated [`RtEstimate`] row per surviving day.
//!   4. Optionally query `posteriors()` / `log_likelihood()` or call
//!      [`highest_density_table`] again at another mass.
//! - Process-noise calibration over candidate sigmas lives in
//!   [`crate::calibration`] and builds on this module's stages.
//! - Python bindings are expected to import from this module (or its
//!   [`prelude`]) and rely on the `RtError` / `PresetError` conversions
//!   into `PyErr` defined in [`errors`].
//!
//! Testing notes
//! -------------
//! - Unit tests in [`core`] cover series validation, preset constants,
//!   smoothing semantics, posterior normalization and degeneracy, and
//!   interval semantics including typed failures.
//! - Unit tests in [`models`] cover construction, end-to-end runs, and
//!   cache behavior; unit tests in [`errors`] cover `Display` payloads,
//!   date stamping, and wrapping.
//! - Integration tests exercise full pipelines through the public
//!   [`RtModel`] API.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------
//
// These are the everyday types most users need. Lower-level pieces (the
// raw pipeline stages) remain importable from [`core`].

pub use self::core::{
    CaseSeries, HdiInterval, RtEstimate, RtGrid, RtPosteriors, RtPreset, SmoothedCases,
    compute_posteriors, highest_density_interval, highest_density_table, smooth_cases,
};

pub use self::errors::{PresetError, PresetResult, RtError, RtResult};

pub use self::models::{DEFAULT_CREDIBLE_MASS, RtModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_epirt::rt::prelude::*;
//
// to import the main Rt-estimation surface in a single line, without
// pulling in lower-level internals.

pub mod prelude {
    pub use super::{
        CaseSeries, DEFAULT_CREDIBLE_MASS, HdiInterval, PresetError, PresetResult, RtError,
        RtEstimate, RtGrid, RtModel, RtPosteriors, RtPreset, RtResult, SmoothedCases,
    };
}
