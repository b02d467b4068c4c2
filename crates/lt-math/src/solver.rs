//! Exponential-tilt probability solver.
//!
//! Maps a payout table and a target per-pull expectation to a probability
//! vector of the exponential family `p_i(β) = exp(β·v_i) / Σ exp(β·v_j)`.
//! The expectation of that family is continuous and strictly increasing in
//! β (all mass drifts to the minimum payout as β → −∞ and to the maximum as
//! β → +∞), so a bracketed bisection on β reaches any target strictly
//! between the two.

/// Tolerance for treating a target as pinned to the payout range boundary.
const BOUNDARY_EPS: f64 = 1e-12;

/// Maximum bracket-doubling steps before bisection starts.
const BRACKET_ITERS: usize = 60;

/// Fixed bisection step count (interval shrinks by 2^-80).
const BISECT_ITERS: usize = 80;

/// Tilted (softmax) distribution over `payouts` at inverse temperature `beta`.
///
/// Stabilized by subtracting the maximum exponent before exponentiating, so
/// large `beta * payout` products cannot overflow.
pub fn tilted_distribution(payouts: &[f64], beta: f64) -> Vec<f64> {
    if payouts.is_empty() {
        return Vec::new();
    }
    let top = payouts
        .iter()
        .fold(f64::NEG_INFINITY, |acc, &v| acc.max(beta * v));
    let weights: Vec<f64> = payouts.iter().map(|&v| (beta * v - top).exp()).collect();
    let z: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / z).collect()
}

/// Expectation `Σ p_i(β)·v_i` of the tilted distribution.
pub fn tilted_expectation(payouts: &[f64], beta: f64) -> f64 {
    tilted_distribution(payouts, beta)
        .iter()
        .zip(payouts)
        .map(|(p, v)| p * v)
        .sum()
}

/// Inverse-proportional weighting: cheap payouts carry the mass.
///
/// `w_i = 1/v_i` for positive payouts, zero otherwise, normalized by the
/// weight sum. An all-nonpositive table normalizes against 1 and comes back
/// all zero.
pub fn inverse_proportional(payouts: &[f64]) -> Vec<f64> {
    let inv: Vec<f64> = payouts
        .iter()
        .map(|&v| if v > 0.0 { 1.0 / v } else { 0.0 })
        .collect();
    let sum: f64 = inv.iter().sum();
    let denom = if sum > 0.0 { sum } else { 1.0 };
    inv.into_iter().map(|w| w / denom).collect()
}

/// Solves for probabilities whose per-pull expectation hits `target`.
///
/// Degenerate targets short-circuit before any root finding: empty input
/// returns empty; a non-finite or non-positive target takes the
/// inverse-proportional fallback; a target within [`BOUNDARY_EPS`] of the
/// minimum payout (or below) pins mass on the minimum, and the symmetric
/// rule holds at the maximum. Boundary ties are left un-normalized, one
/// full unit per tied symbol; the preview layer's drift warning surfaces
/// that state to the operator.
///
/// Interior targets: the `[lo, hi]` bracket doubles outward (at most
/// [`BRACKET_ITERS`] steps) until `[E(lo), E(hi)]` straddles the target,
/// then [`BISECT_ITERS`] bisection steps narrow it and the distribution is
/// evaluated at the bracket midpoint.
pub fn solve_for_target(payouts: &[f64], target: f64) -> Vec<f64> {
    if payouts.is_empty() {
        return Vec::new();
    }
    if !target.is_finite() || target <= 0.0 {
        return inverse_proportional(payouts);
    }
    let vmin = payouts.iter().fold(f64::INFINITY, |acc, &v| acc.min(v));
    let vmax = payouts.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    if target <= vmin + BOUNDARY_EPS {
        return payouts
            .iter()
            .map(|&v| if v == vmin { 1.0 } else { 0.0 })
            .collect();
    }
    if target >= vmax - BOUNDARY_EPS {
        return payouts
            .iter()
            .map(|&v| if v == vmax { 1.0 } else { 0.0 })
            .collect();
    }

    let mut lo = -1.0_f64;
    let mut hi = 1.0_f64;
    for _ in 0..BRACKET_ITERS {
        if tilted_expectation(payouts, lo) > target {
            lo *= 2.0;
            continue;
        }
        if tilted_expectation(payouts, hi) < target {
            hi *= 2.0;
            continue;
        }
        break;
    }
    for _ in 0..BISECT_ITERS {
        let mid = 0.5 * (lo + hi);
        if tilted_expectation(payouts, mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    tilted_distribution(payouts, 0.5 * (lo + hi))
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
