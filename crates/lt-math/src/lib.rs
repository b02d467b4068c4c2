//! # LuckyTilt Math
//!
//! Pure numerics behind the LuckyTilt kiosk slot: turns operator-facing
//! payout tables into per-symbol probabilities and exact round-total odds.
//!
//! ## Features
//!
//! - **Exponential-tilt solver**: probabilities of the Boltzmann family
//!   `p_i ∝ exp(β·v_i)`, with β fitted so the per-pull expectation hits a
//!   target value
//! - **Inverse-proportional fallback** for unset or degenerate targets
//! - **Expectation helpers**: fraction and percent forms, harmonic baseline,
//!   percent normalization
//! - **Round-total PMF**: exact threshold odds over N pulls by integer-grid
//!   convolution
//!
//! ## Architecture
//!
//! ```text
//! payouts + target ──► solver ──► probabilities ─┬─► expectation
//!                                                └─► TotalPmf ──► P(total ≥ t)
//! ```
//!
//! No I/O, no globals, no RNG. Every function is pure and reentrant.

pub mod expectation;
pub mod pmf;
pub mod solver;

pub use expectation::*;
pub use pmf::*;
pub use solver::*;
