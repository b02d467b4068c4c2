//! Game configuration: tuning, validation, persistence, shared handle.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::optimizer::RangeTarget;
use crate::prize::PrizeTable;
use crate::symbols::SymbolTable;
use lt_math::TotalPmf;

/// Pulls per round unless the config says otherwise.
pub const DEFAULT_PULLS: u32 = 5;

/// Floor for payouts entering the inverse weighting, keeps `1/v` finite.
const INVERSE_CLAMP: f64 = 1e-9;

fn default_reels() -> u8 {
    3
}

fn default_base_bet() -> u32 {
    1
}

fn default_pulls() -> u32 {
    DEFAULT_PULLS
}

fn default_expected_total() -> f64 {
    2500.0
}

/// Full machine configuration as the operator screen edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Symbol table, draw order = display order
    #[serde(default)]
    pub symbols: SymbolTable,
    /// Reel count (the machine is three-reel; kept for display/persistence)
    #[serde(default = "default_reels")]
    pub reels: u8,
    /// Credits staked per round
    #[serde(default = "default_base_bet")]
    pub base_bet: u32,
    /// Pulls played per round
    #[serde(default = "default_pulls")]
    pub pulls_per_round: u32,
    /// Expected total payout per round, after the miss rate is applied
    #[serde(default = "default_expected_total")]
    pub expected_round_total: f64,
    /// Forced-miss probability per pull, in percent (must stay below 100)
    #[serde(default)]
    pub miss_percent: f64,
    /// Optimizer band targets, empty when unused
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range_targets: Vec<RangeTarget>,
    /// Prize ladder on the round total, empty means no prizes
    #[serde(default, skip_serializing_if = "PrizeTable::is_empty")]
    pub prizes: PrizeTable,
}

impl GameConfig {
    /// Classic seven-symbol machine with a self-consistent expected total
    /// (the harmonic baseline of its payouts).
    pub fn classic() -> Self {
        let symbols = SymbolTable::classic();
        let expected =
            lt_math::harmonic_round_expectation(&symbols.payouts(), DEFAULT_PULLS);
        Self {
            symbols,
            reels: default_reels(),
            base_bet: default_base_bet(),
            pulls_per_round: DEFAULT_PULLS,
            expected_round_total: expected,
            miss_percent: 0.0,
            range_targets: Vec::new(),
            prizes: PrizeTable::classic(),
        }
    }

    /// Miss rate as a fraction.
    pub fn miss_rate(&self) -> f64 {
        self.miss_percent / 100.0
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SANITIZING & VALIDATION
    // ═══════════════════════════════════════════════════════════════════════

    /// Clamps bad inputs at the boundary. Negative or non-finite payouts
    /// become 0, as does a negative or non-finite miss rate; the solver
    /// itself never sanitizes.
    pub fn sanitize(&mut self) {
        let mut clamped = 0usize;
        for sym in &mut self.symbols.symbols {
            if !sym.payout.is_finite() || sym.payout < 0.0 {
                sym.payout = 0.0;
                clamped += 1;
            }
        }
        if clamped > 0 {
            log::warn!("clamped {clamped} invalid payout(s) to 0");
        }
        if !self.miss_percent.is_finite() || self.miss_percent < 0.0 {
            log::warn!("clamped miss rate {} to 0", self.miss_percent);
            self.miss_percent = 0.0;
        }
    }

    /// Structural checks. Does not mutate; run [`Self::sanitize`] first
    /// when the input comes from outside.
    pub fn validate(&self) -> EngineResult<()> {
        if self.symbols.is_empty() {
            return Err(EngineError::InvalidConfig(
                "symbol table is empty".to_string(),
            ));
        }
        if self.symbols.paying().is_empty() {
            return Err(EngineError::InvalidConfig(
                "symbol table needs at least one paying symbol".to_string(),
            ));
        }
        let mut ids = HashSet::new();
        for sym in self.symbols.iter() {
            if !ids.insert(sym.id.as_str()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate symbol id `{}`",
                    sym.id
                )));
            }
        }
        if self.pulls_per_round == 0 {
            return Err(EngineError::InvalidConfig(
                "pulls_per_round must be at least 1".to_string(),
            ));
        }
        if self.miss_percent >= 100.0 {
            return Err(EngineError::MissRateTooHigh {
                percent: self.miss_percent,
            });
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TUNING
    // ═══════════════════════════════════════════════════════════════════════

    /// Tunes percents so the round expectation hits `target_round_total`.
    ///
    /// The target is split into a per-pull value and inflated by
    /// `1 / (1 - miss_rate)` so that forced misses do not drag the realized
    /// expectation under the target. The solver's output lands back in the
    /// symbol percents, and `expected_round_total` is recomputed from what
    /// the percents actually deliver.
    pub fn apply_target(&mut self, target_round_total: f64) -> EngineResult<()> {
        self.sanitize();
        self.validate()?;
        let miss_rate = self.miss_rate();
        let per_pull = target_round_total / f64::from(self.pulls_per_round);
        let adjusted = per_pull / (1.0 - miss_rate);

        let payouts = self.symbols.payouts();
        let probs = lt_math::solve_for_target(&payouts, adjusted);
        let percents: Vec<f64> = probs.iter().map(|p| p * 100.0).collect();
        self.symbols.set_percents(&percents);

        let actual_per_pull = lt_math::expectation_percent(&payouts, &self.symbols.percents());
        self.expected_round_total =
            actual_per_pull * f64::from(self.pulls_per_round) * (1.0 - miss_rate);
        log::info!(
            "tuned for round total {target_round_total}: expected {:.2} at {:.1}% miss",
            self.expected_round_total,
            self.miss_percent
        );
        Ok(())
    }

    /// No-target path: inverse-proportional percents plus the expected
    /// total they realize. Payouts are floored at [`INVERSE_CLAMP`] for the
    /// weighting only.
    pub fn recalc_inverse(&mut self) {
        let payouts = self.symbols.payouts();
        let inv: Vec<f64> = payouts.iter().map(|&v| 1.0 / v.max(INVERSE_CLAMP)).collect();
        let sum: f64 = inv.iter().sum();
        let denom = if sum == 0.0 { 1.0 } else { sum };
        let percents: Vec<f64> = inv.iter().map(|w| w / denom * 100.0).collect();
        self.symbols.set_percents(&percents);

        let per_pull = lt_math::expectation_percent(&payouts, &self.symbols.percents());
        self.expected_round_total = per_pull * f64::from(self.pulls_per_round);
    }

    /// Round-total distribution for threshold odds.
    pub fn total_pmf(&self, pulls: u32) -> EngineResult<TotalPmf> {
        Ok(TotalPmf::new(
            &self.symbols.payouts(),
            &self.symbols.percents(),
            pulls,
        )?)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // PERSISTENCE
    // ═══════════════════════════════════════════════════════════════════════

    /// Load from a JSON file; a missing or unreadable file falls back to
    /// the classic defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "config at {} unreadable ({e}), using defaults",
                        path.as_ref().display()
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save as pretty JSON.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("config saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Parse a hand-authored YAML preset.
    pub fn from_yml_str(content: &str) -> EngineResult<Self> {
        Ok(serde_yml::from_str(content)?)
    }

    /// Serialize for YAML preset authoring.
    pub fn to_yml_string(&self) -> EngineResult<String> {
        Ok(serde_yml::to_string(self)?)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SHARED HANDLE
// ═══════════════════════════════════════════════════════════════════════════

/// Clone-cheap shared config for concurrent readers and an exclusive
/// writer. The math layer stays pure; this is the only lock in the crate.
#[derive(Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<GameConfig>>,
}

impl SharedConfig {
    pub fn new(config: GameConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Read guard.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, GameConfig> {
        self.inner.read()
    }

    /// Write guard.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, GameConfig> {
        self.inner.write()
    }

    /// Owned snapshot for a round engine.
    pub fn snapshot(&self) -> GameConfig {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolDef;
    use approx::assert_relative_eq;

    #[test]
    fn test_apply_target_hits_expectation() {
        let mut config = GameConfig::classic();
        config.apply_target(250.0).unwrap();
        assert_relative_eq!(config.expected_round_total, 250.0, epsilon = 1e-6);
        assert_relative_eq!(config.symbols.total_percent(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_apply_target_compensates_miss_rate() {
        let mut config = GameConfig::classic();
        config.miss_percent = 20.0;
        config.apply_target(250.0).unwrap();
        // Paying pulls are tuned hotter so forced misses average out.
        assert_relative_eq!(config.expected_round_total, 250.0, epsilon = 1e-6);
        let per_pull =
            lt_math::expectation_percent(&config.symbols.payouts(), &config.symbols.percents());
        assert_relative_eq!(per_pull, 62.5, epsilon = 1e-6);
    }

    #[test]
    fn test_apply_target_rejects_full_miss_rate() {
        let mut config = GameConfig::classic();
        config.miss_percent = 100.0;
        assert!(matches!(
            config.apply_target(250.0),
            Err(EngineError::MissRateTooHigh { .. })
        ));
    }

    #[test]
    fn test_recalc_inverse_matches_harmonic_baseline() {
        let mut config = GameConfig::classic();
        config.recalc_inverse();
        let expected =
            lt_math::harmonic_round_expectation(&config.symbols.payouts(), config.pulls_per_round);
        assert_relative_eq!(config.expected_round_total, expected, epsilon = 1e-9);
        assert_relative_eq!(config.symbols.total_percent(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sanitize_clamps_negative_inputs() {
        let mut config = GameConfig::classic();
        config.symbols.symbols[0].payout = -50.0;
        config.miss_percent = -5.0;
        config.sanitize();
        assert_eq!(config.symbols.symbols[0].payout, 0.0);
        assert_eq!(config.miss_percent, 0.0);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut config = GameConfig::classic();
        config.symbols.symbols[1].id = "GOD".to_string();
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_requires_paying_symbol() {
        let config = GameConfig {
            symbols: SymbolTable::new(vec![SymbolDef::teaser("t", "T", "seven")]),
            ..GameConfig::classic()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::classic();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.reels, 3);
        assert_eq!(config.pulls_per_round, 5);
        assert_eq!(config.expected_round_total, 2500.0);
        assert_eq!(config.symbols.len(), 7);
        assert!(config.prizes.is_empty());
    }

    #[test]
    fn test_yml_round_trip() {
        let config = GameConfig::classic();
        let yml = config.to_yml_string().unwrap();
        let back = GameConfig::from_yml_str(&yml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = GameConfig::load_from("/nonexistent/lucky-tilt.json");
        assert_eq!(config, GameConfig::classic());
    }

    #[test]
    fn test_shared_config_read_write() {
        let shared = SharedConfig::new(GameConfig::classic());
        shared.write().miss_percent = 10.0;
        assert_eq!(shared.read().miss_percent, 10.0);
        assert_eq!(shared.snapshot().miss_percent, 10.0);
    }
}
