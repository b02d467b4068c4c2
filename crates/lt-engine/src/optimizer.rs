//! Band-share optimizer: distributes probability so payout bands hold
//! requested shares while the round expectation walks onto its target.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::EngineResult;
use crate::symbols::SymbolDef;

/// One payout band and the share of total probability it should hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeTarget {
    /// Inclusive lower payout bound
    pub lo: f64,
    /// Inclusive upper bound; `None` leaves the band open-ended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi: Option<f64>,
    /// Share of total probability, in percent
    pub share_percent: f64,
}

impl RangeTarget {
    pub fn contains(&self, payout: f64) -> bool {
        payout >= self.lo && self.hi.is_none_or(|h| payout <= h)
    }
}

/// Loop bounds for the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 0.01,
        }
    }
}

/// Best state the optimizer visited.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerOutcome {
    /// Symbols with the winning percent column
    pub symbols: Vec<SymbolDef>,
    /// Combined error of the winning state
    pub error: f64,
    pub iterations: u32,
    pub converged: bool,
}

/// Iteratively reshapes the percent column.
///
/// Each pass scores the combined error (expectation gap plus band-share
/// gaps weighted tenfold), keeps the best state seen so far, then nudges
/// the three largest payouts up by 1% when the expectation runs low (the
/// three smallest when it runs high), rescales each off-share band back
/// onto its target, and renormalizes to 100. The best state is returned
/// even when the loop runs out of iterations.
pub fn optimize(
    symbols: &[SymbolDef],
    targets: &[RangeTarget],
    target_round_total: f64,
    miss_percent: f64,
    pulls: u32,
    settings: &OptimizerSettings,
) -> OptimizerOutcome {
    let mut working: Vec<SymbolDef> = symbols.to_vec();
    let bands: Vec<Vec<usize>> = targets
        .iter()
        .map(|t| {
            working
                .iter()
                .enumerate()
                .filter(|(_, s)| t.contains(s.payout))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();
    for (band, target) in bands.iter().zip(targets) {
        if band.is_empty() {
            continue;
        }
        let each = target.share_percent / band.len() as f64;
        for &i in band {
            working[i].prob = each;
        }
    }

    let keep = 1.0 - miss_percent / 100.0;
    let mut best = working.clone();
    let mut best_error = f64::INFINITY;
    let mut iterations = 0;
    for iter in 0..settings.max_iterations {
        iterations = iter + 1;
        let expected: f64 = working
            .iter()
            .map(|s| s.payout * s.prob / 100.0)
            .sum::<f64>()
            * keep
            * f64::from(pulls);
        let mut total_error = (expected - target_round_total).abs();
        let mut shares = Vec::with_capacity(bands.len());
        for (band, target) in bands.iter().zip(targets) {
            let share: f64 = band.iter().map(|&i| working[i].prob).sum();
            total_error += 10.0 * (share - target.share_percent).abs();
            shares.push(share);
        }
        if total_error < best_error {
            best_error = total_error;
            best = working.clone();
        }
        if total_error < settings.tolerance {
            break;
        }

        let mut order: Vec<usize> = (0..working.len()).collect();
        if expected < target_round_total {
            order.sort_by(|&a, &b| working[b].payout.total_cmp(&working[a].payout));
        } else {
            order.sort_by(|&a, &b| working[a].payout.total_cmp(&working[b].payout));
        }
        for &i in order.iter().take(3) {
            working[i].prob *= 1.01;
        }

        for ((band, target), share) in bands.iter().zip(targets).zip(&shares) {
            if (share - target.share_percent).abs() > settings.tolerance {
                let factor = target.share_percent / (share + 1e-9);
                for &i in band {
                    working[i].prob *= factor;
                }
            }
        }
        let total: f64 = working.iter().map(|s| s.prob).sum();
        if total > 0.0 {
            for s in &mut working {
                s.prob *= 100.0 / total;
            }
        }
    }

    let converged = best_error < settings.tolerance * 100.0;
    if !converged {
        log::warn!("optimizer stopped at error {best_error:.3} after {iterations} iteration(s)");
    }
    OptimizerOutcome {
        symbols: best,
        error: best_error,
        iterations,
        converged,
    }
}

/// Runs the optimizer against a config's own band targets and writes the
/// winning percents back, recomputing the realized expectation.
pub fn apply_range_targets(
    config: &mut GameConfig,
    settings: &OptimizerSettings,
) -> EngineResult<OptimizerOutcome> {
    config.sanitize();
    config.validate()?;
    let outcome = optimize(
        &config.symbols.symbols,
        &config.range_targets,
        config.expected_round_total,
        config.miss_percent,
        config.pulls_per_round,
        settings,
    );
    let percents: Vec<f64> = outcome.symbols.iter().map(|s| s.prob).collect();
    config.symbols.set_percents(&percents);
    let per_pull =
        lt_math::expectation_percent(&config.symbols.payouts(), &config.symbols.percents());
    config.expected_round_total =
        per_pull * f64::from(config.pulls_per_round) * (1.0 - config.miss_rate());
    Ok(outcome)
}
