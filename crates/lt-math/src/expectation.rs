//! Expectation and normalization helpers shared by the engine and tooling.

/// Smallest payout magnitude the harmonic baseline will divide by.
const MIN_POSITIVE_PAYOUT: f64 = 1e-9;

/// `Σ v_i·p_i` with probabilities as fractions.
pub fn expectation(payouts: &[f64], probs: &[f64]) -> f64 {
    payouts.iter().zip(probs).map(|(v, p)| v * p).sum()
}

/// `Σ v_i·(pct_i/100)` with percent-stored probabilities.
pub fn expectation_percent(payouts: &[f64], percents: &[f64]) -> f64 {
    payouts
        .iter()
        .zip(percents)
        .map(|(v, pct)| v * pct / 100.0)
        .sum()
}

/// "Fair inverse" expected round total: `pulls` times the harmonic mean of
/// the positive payouts (each clamped to at least [`MIN_POSITIVE_PAYOUT`]).
///
/// The harmonic mean is exactly the per-pull expectation the
/// inverse-proportional weighting realizes, so this doubles as the default
/// round target when an operator has not set one. Zero when no positive
/// payout exists.
pub fn harmonic_round_expectation(payouts: &[f64], pulls: u32) -> f64 {
    let vals: Vec<f64> = payouts
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| v.max(MIN_POSITIVE_PAYOUT))
        .collect();
    if vals.is_empty() {
        return 0.0;
    }
    let hm = vals.len() as f64 / vals.iter().map(|v| 1.0 / v).sum::<f64>();
    hm * f64::from(pulls)
}

/// Rescales weights so they sum to 100.0.
///
/// An all-zero vector has no scale and is returned unchanged.
pub fn normalize_percent(weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        return weights.to_vec();
    }
    weights.iter().map(|w| w / sum * 100.0).collect()
}
