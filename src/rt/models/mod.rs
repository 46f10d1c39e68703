//! models — user-facing Rt estimation models.
//!
//! Purpose
//! -------
//! Expose the orchestrating model API on top of `rt::core`: a single type
//! that runs the full smooth → filter → extract pipeline and keeps its
//! posterior output around for follow-up queries.
//!
//! Key behaviors
//! -------------
//! - Provide [`RtModel`] with `new` / `with_mass` construction, a `run`
//!   method returning dated [`RtEstimate`] rows, and accessors for the
//!   cached posterior set and its log-likelihood ([`bayesian`]).
//! - Default the credible mass to [`DEFAULT_CREDIBLE_MASS`] and validate
//!   explicit masses once, at construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - A model's preset and mass are fixed after construction; calibration
//!   builds per-sigma preset variants upstream instead of mutating models.
//! - The cached posterior set always comes from the last successful run;
//!   failed runs leave it untouched.
//!
//! Conventions
//! -----------
//! - `run` takes `&mut self` only to update the cache; the pipeline itself
//!   is pure with respect to the input series.
//!
//! Downstream usage
//! ----------------
//! - Library callers and the Python bindings construct an [`RtModel`] from
//!   a preset (by name or value) and call `run` per series; calibration
//!   drives `rt::core` directly for its per-sigma scoring.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`bayesian`] cover construction, mass validation,
//!   end-to-end runs, trimming, error propagation, and cache semantics.
//! - Integration tests cover cross-preset behavior, determinism, and
//!   interval-width ordering through this surface.

pub mod bayesian;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bayesian::{DEFAULT_CREDIBLE_MASS, RtModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_epirt::rt::models::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::bayesian::{DEFAULT_CREDIBLE_MASS, RtModel};
}
