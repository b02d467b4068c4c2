//! Seeded batch simulation for verifying a tuning against realized play.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::EngineResult;
use crate::round::RoundEngine;

/// Bucket edges for the round-total histogram.
const EDGES: [f64; 5] = [100.0, 250.0, 500.0, 1000.0, 2500.0];
const LABELS: [&str; 6] = ["0-99", "100-249", "250-499", "500-999", "1000-2499", "2500+"];

/// One histogram bucket of round totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub label: String,
    pub count: u64,
}

/// Aggregate view of a simulation run, ready for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rounds: u64,
    pub pulls: u64,
    pub mean_round_total: f64,
    pub hit_rate: f64,
    pub near_miss_rate: f64,
    pub miss_rate: f64,
    /// What the config claims the mean should be
    pub expected_round_total: f64,
    /// Rounds won per prize rank
    pub prize_counts: BTreeMap<u32, u64>,
    pub histogram: Vec<ScoreBucket>,
}

fn bucket_index(total: f64) -> usize {
    EDGES.iter().take_while(|&&edge| total >= edge).count()
}

/// Plays `rounds` seeded rounds against a config snapshot and aggregates
/// the results. The caller's config is untouched.
pub fn simulate(config: &GameConfig, rounds: u64, seed: u64) -> EngineResult<SimulationReport> {
    let mut engine = RoundEngine::new(config.clone())?;
    engine.seed(seed);

    let mut prize_counts: BTreeMap<u32, u64> = BTreeMap::new();
    let mut counts = [0u64; LABELS.len()];
    for _ in 0..rounds {
        let round = engine.play_round();
        if let Some(prize) = &round.prize {
            *prize_counts.entry(prize.rank).or_insert(0) += 1;
        }
        counts[bucket_index(round.total_payout)] += 1;
    }

    let stats = engine.stats();
    let histogram = LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| ScoreBucket {
            label: (*label).to_string(),
            count,
        })
        .collect();
    log::info!(
        "simulated {rounds} round(s): mean total {:.2}, hit rate {:.1}%",
        stats.mean_round_total(),
        stats.hit_rate()
    );
    Ok(SimulationReport {
        rounds: stats.rounds,
        pulls: stats.pulls,
        mean_round_total: stats.mean_round_total(),
        hit_rate: stats.hit_rate(),
        near_miss_rate: stats.near_miss_rate(),
        miss_rate: stats.miss_rate(),
        expected_round_total: engine.config().expected_round_total,
        prize_counts,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{SymbolDef, SymbolTable};

    #[test]
    fn test_bucket_index_edges() {
        assert_eq!(bucket_index(0.0), 0);
        assert_eq!(bucket_index(99.9), 0);
        assert_eq!(bucket_index(100.0), 1);
        assert_eq!(bucket_index(2499.9), 4);
        assert_eq!(bucket_index(2500.0), 5);
        assert_eq!(bucket_index(50_000.0), 5);
    }

    #[test]
    fn test_same_seed_same_report() {
        let config = GameConfig::classic();
        let a = simulate(&config, 200, 99).unwrap();
        let b = simulate(&config, 200, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_certain_jackpot_fills_top_bucket() {
        let config = GameConfig {
            symbols: SymbolTable::new(vec![
                SymbolDef::paying("seven", "７", 500.0).with_prob(100.0),
            ]),
            ..GameConfig::classic()
        };
        let report = simulate(&config, 50, 1).unwrap();
        assert_eq!(report.mean_round_total, 2500.0);
        assert_eq!(report.hit_rate, 100.0);
        assert_eq!(report.histogram[5].count, 50);
        // Every round clears the gold tier.
        assert_eq!(report.prize_counts.get(&1), Some(&50));
    }

    #[test]
    fn test_zero_rounds_is_empty_report() {
        let report = simulate(&GameConfig::classic(), 0, 7).unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(report.mean_round_total, 0.0);
        assert!(report.prize_counts.is_empty());
        assert!(report.histogram.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = simulate(&GameConfig::classic(), 10, 3).unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"mean_round_total\""));
        assert!(json.contains("\"histogram\""));
    }
}
