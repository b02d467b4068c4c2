//! Round engine: weighted symbol draws, forced misses, near-miss staging,
//! and per-session statistics.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::EngineResult;
use crate::prize::PrizeTier;

// ═══════════════════════════════════════════════════════════════════════════
// RESULT TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// What one reel shows after it stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelFace {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Classification of a single pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PullOutcome {
    /// Three of a kind, pays `payout`
    Win { symbol: String, payout: f64 },
    /// Two of a kind then a break on the third reel, pays nothing
    NearMiss { teased: String },
    /// Forced miss, reels arranged so no line forms
    Miss,
}

/// One pull: the three stopped faces plus the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullResult {
    pub reels: [ReelFace; 3],
    pub outcome: PullOutcome,
}

impl PullResult {
    pub fn payout(&self) -> f64 {
        match &self.outcome {
            PullOutcome::Win { payout, .. } => *payout,
            _ => 0.0,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self.outcome, PullOutcome::Win { .. })
    }

    pub fn is_near_miss(&self) -> bool {
        matches!(self.outcome, PullOutcome::NearMiss { .. })
    }
}

/// A full round of pulls with its total and any prize the total earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub pulls: Vec<PullResult>,
    pub total_payout: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<PrizeTier>,
}

/// Running counters across everything an engine has played.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub rounds: u64,
    pub pulls: u64,
    pub wins: u64,
    pub near_misses: u64,
    pub misses: u64,
    pub total_payout: f64,
}

impl SessionStats {
    /// Winning pulls as a percentage of all pulls.
    pub fn hit_rate(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.wins as f64 / self.pulls as f64 * 100.0
        }
    }

    /// Near-miss pulls as a percentage of all pulls.
    pub fn near_miss_rate(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.near_misses as f64 / self.pulls as f64 * 100.0
        }
    }

    /// Forced misses as a percentage of all pulls.
    pub fn miss_rate(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.misses as f64 / self.pulls as f64 * 100.0
        }
    }

    /// Average payout per round.
    pub fn mean_round_total(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_payout / self.rounds as f64
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════

/// Plays rounds against a validated config snapshot.
///
/// The engine owns its RNG so concurrent engines never contend; reseed
/// with [`Self::seed`] for reproducible sequences.
pub struct RoundEngine {
    config: GameConfig,
    rng: StdRng,
    stats: SessionStats,
}

impl RoundEngine {
    /// Validates and normalizes the config, then seeds from the OS.
    pub fn new(mut config: GameConfig) -> EngineResult<Self> {
        config.sanitize();
        config.validate()?;
        config.symbols.normalize_percents();
        Ok(Self {
            config,
            rng: StdRng::from_os_rng(),
            stats: SessionStats::default(),
        })
    }

    /// Reseed for a reproducible run.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    /// Draws a symbol index from the percent column, in hundredth-of-a-
    /// percent buckets. Zero total weight falls through to the last symbol.
    fn draw_index(&mut self) -> usize {
        let weights: Vec<u64> = self
            .config
            .symbols
            .iter()
            .map(|s| (s.prob * 100.0).round().max(0.0) as u64)
            .collect();
        let total: u64 = weights.iter().sum();
        if total == 0 {
            return weights.len().saturating_sub(1);
        }
        let r = self.rng.random_range(0..total);
        let mut acc = 0u64;
        for (i, w) in weights.iter().enumerate() {
            acc += w;
            if r < acc {
                return i;
            }
        }
        weights.len() - 1
    }

    /// Draws one symbol by weight, without playing a pull.
    pub fn draw(&mut self) -> &crate::symbols::SymbolDef {
        let i = self.draw_index();
        &self.config.symbols.symbols[i]
    }

    fn face(&self, idx: usize) -> ReelFace {
        let sym = &self.config.symbols.symbols[idx];
        ReelFace {
            id: sym.id.clone(),
            label: sym.label.clone(),
            color: sym.color.clone(),
        }
    }

    fn uniform_paying(&mut self, pool: &[usize]) -> usize {
        pool[self.rng.random_range(0..pool.len())]
    }

    /// Plays a single pull.
    ///
    /// A forced miss (rolled against `miss_percent`) shows paying faces
    /// arranged so the line breaks on reel two. Otherwise a weighted draw
    /// picks the pull's symbol: a teaser stages two copies of the symbol
    /// it mimics before breaking on reel three, a paying symbol lines up
    /// all three reels.
    pub fn pull(&mut self) -> PullResult {
        let paying: Vec<usize> = self
            .config
            .symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.near_miss)
            .map(|(i, _)| i)
            .collect();

        let result = if self.rng.random::<f64>() < self.config.miss_rate() {
            let a = self.uniform_paying(&paying);
            let a_id = self.config.symbols.symbols[a].id.clone();
            let b_pool: Vec<usize> = paying
                .iter()
                .copied()
                .filter(|&j| self.config.symbols.symbols[j].id != a_id)
                .collect();
            // A one-symbol table cannot break the line; the miss is
            // still recorded as a miss and pays nothing.
            let b = if b_pool.is_empty() {
                a
            } else {
                self.uniform_paying(&b_pool)
            };
            let c = self.uniform_paying(&paying);
            PullResult {
                reels: [self.face(a), self.face(b), self.face(c)],
                outcome: PullOutcome::Miss,
            }
        } else {
            let i = self.draw_index();
            if self.config.symbols.symbols[i].near_miss {
                let sym = &self.config.symbols.symbols[i];
                let mimic_id = sym.mimics.clone().unwrap_or_else(|| sym.id.clone());
                let original = paying
                    .iter()
                    .copied()
                    .find(|&j| self.config.symbols.symbols[j].id == mimic_id)
                    .unwrap_or(i);
                let pool: Vec<usize> = paying
                    .iter()
                    .copied()
                    .filter(|&j| self.config.symbols.symbols[j].id != mimic_id)
                    .collect();
                let third = if pool.is_empty() {
                    original
                } else {
                    self.uniform_paying(&pool)
                };
                PullResult {
                    reels: [self.face(original), self.face(original), self.face(third)],
                    outcome: PullOutcome::NearMiss {
                        teased: self.config.symbols.symbols[original].id.clone(),
                    },
                }
            } else {
                let sym = &self.config.symbols.symbols[i];
                let payout = sym.payout;
                let symbol = sym.id.clone();
                PullResult {
                    reels: [self.face(i), self.face(i), self.face(i)],
                    outcome: PullOutcome::Win { symbol, payout },
                }
            }
        };

        self.stats.pulls += 1;
        match &result.outcome {
            PullOutcome::Win { payout, .. } => {
                self.stats.wins += 1;
                self.stats.total_payout += payout;
            }
            PullOutcome::NearMiss { .. } => self.stats.near_misses += 1,
            PullOutcome::Miss => self.stats.misses += 1,
        }
        result
    }

    /// Plays a full round and settles the prize on the truncated total.
    pub fn play_round(&mut self) -> RoundResult {
        let count = self.config.pulls_per_round.max(1);
        let pulls: Vec<PullResult> = (0..count).map(|_| self.pull()).collect();
        let total_payout: f64 = pulls.iter().map(PullResult::payout).sum();
        let prize = self.config.prizes.award_for(total_payout.trunc()).cloned();
        self.stats.rounds += 1;
        RoundResult {
            pulls,
            total_payout,
            prize,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
