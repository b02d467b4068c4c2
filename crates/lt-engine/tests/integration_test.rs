//! End-to-End Round Pipeline Integration Tests
//!
//! Tests the complete tuning-to-play pipeline:
//! - Target tuning against realized play
//! - Miss-rate compensation
//! - Near-miss staging and the presentation timeline
//! - Threshold odds against simulation

use lt_engine::{
    generate_timeline, preview, simulate, GameConfig, PullOutcome, RoundEngine, RoundStage,
    SymbolDef, SymbolTable, TimingConfig,
};

const ROUNDS: u64 = 50_000;
const SEED: u64 = 1337;
const TARGET_TOTAL: f64 = 250.0;

// ═══════════════════════════════════════════════════════════════════════════════
// TUNING VS REALIZED PLAY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_tuned_classic_hits_target_in_play() {
    let mut config = GameConfig::classic();
    config.apply_target(TARGET_TOTAL).unwrap();

    let report = simulate(&config, ROUNDS, SEED).unwrap();
    assert!(
        (report.mean_round_total - TARGET_TOTAL).abs() < 10.0,
        "mean {} drifted from target {}",
        report.mean_round_total,
        TARGET_TOTAL
    );
    // No teasers and no forced misses: every pull is three of a kind.
    assert_eq!(report.hit_rate, 100.0);
}

#[test]
fn test_miss_rate_compensation_holds_in_play() {
    let mut config = GameConfig::classic();
    config.miss_percent = 20.0;
    config.apply_target(TARGET_TOTAL).unwrap();

    let report = simulate(&config, ROUNDS, SEED).unwrap();
    assert!(
        (report.mean_round_total - TARGET_TOTAL).abs() < 10.0,
        "mean {} drifted from target {}",
        report.mean_round_total,
        TARGET_TOTAL
    );
    assert!((report.miss_rate - 20.0).abs() < 1.0);
}

#[test]
fn test_inverse_fallback_matches_harmonic_baseline() {
    let mut config = GameConfig::classic();
    config.recalc_inverse();
    let expected = config.expected_round_total;

    let report = simulate(&config, ROUNDS, SEED).unwrap();
    assert!(
        (report.mean_round_total - expected).abs() < 10.0,
        "mean {} drifted from {}",
        report.mean_round_total,
        expected
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// NEAR-MISS STAGING
// ═══════════════════════════════════════════════════════════════════════════════

fn teaser_config() -> GameConfig {
    GameConfig {
        symbols: SymbolTable::new(vec![
            SymbolDef::paying("seven", "７", 100.0).with_prob(35.0),
            SymbolDef::paying("bar", "BAR", 50.0).with_prob(35.0),
            SymbolDef::teaser("ghost", "７", "seven").with_prob(30.0),
        ]),
        ..GameConfig::classic()
    }
}

#[test]
fn test_near_miss_stages_pair_then_break() {
    let mut engine = RoundEngine::new(teaser_config()).unwrap();
    engine.seed(SEED);

    let mut seen = 0;
    for _ in 0..1000 {
        let pull = engine.pull();
        if let PullOutcome::NearMiss { teased } = &pull.outcome {
            seen += 1;
            assert_eq!(teased, "seven");
            assert_eq!(pull.reels[0].id, "seven");
            assert_eq!(pull.reels[1].id, "seven");
            assert_ne!(pull.reels[2].id, "seven");
            assert_eq!(pull.payout(), 0.0);
        }
    }
    assert!(seen > 0, "teaser never drawn in 1000 pulls");
}

#[test]
fn test_near_miss_round_cues_the_timeline() {
    let mut engine = RoundEngine::new(teaser_config()).unwrap();
    engine.seed(SEED);

    // Find a round containing a near miss.
    let mut found = None;
    for _ in 0..100 {
        let round = engine.play_round();
        if round.pulls.iter().any(|p| p.is_near_miss()) {
            found = Some(round);
            break;
        }
    }
    let round = found.expect("no near miss in 100 rounds");
    let events = generate_timeline(&round, &TimingConfig::standard());
    assert!(events
        .iter()
        .any(|e| matches!(&e.stage, RoundStage::AnticipationCue { symbol, .. } if symbol == "seven")));
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMELINE SHAPE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_timeline_covers_every_pull_in_order() {
    let mut engine = RoundEngine::new(GameConfig::classic()).unwrap();
    engine.seed(SEED);
    let round = engine.play_round();
    let events = generate_timeline(&round, &TimingConfig::standard());

    assert!(matches!(events[0].stage, RoundStage::SpinStart { pull: 0 }));
    assert_eq!(events[0].timestamp_ms, 0.0);
    assert!(matches!(
        events.last().unwrap().stage,
        RoundStage::RoundEnd { .. }
    ));
    for pair in events.windows(2) {
        assert!(pair[1].timestamp_ms >= pair[0].timestamp_ms);
    }
    let starts = events
        .iter()
        .filter(|e| matches!(e.stage, RoundStage::SpinStart { .. }))
        .count();
    assert_eq!(starts as u32, engine.config().pulls_per_round);
    let resolves = events
        .iter()
        .filter(|e| matches!(e.stage, RoundStage::PullResolved { .. }))
        .count();
    assert_eq!(resolves, starts);
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIZES AND ODDS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_certain_jackpot_takes_gold_every_round() {
    let config = GameConfig {
        symbols: SymbolTable::new(vec![
            SymbolDef::paying("seven", "７", 500.0).with_prob(100.0),
        ]),
        ..GameConfig::classic()
    };
    let report = simulate(&config, 100, SEED).unwrap();
    assert_eq!(report.mean_round_total, 2500.0);
    assert_eq!(report.prize_counts.get(&1), Some(&100));
}

#[test]
fn test_threshold_odds_match_simulation() {
    let config = GameConfig::classic();
    let pmf = config.total_pmf(config.pulls_per_round).unwrap();
    let predicted = pmf.at_least(100.0);

    let mut engine = RoundEngine::new(config).unwrap();
    engine.seed(SEED);
    let mut hits = 0u64;
    for _ in 0..ROUNDS {
        if engine.play_round().total_payout >= 100.0 {
            hits += 1;
        }
    }
    let observed = hits as f64 / ROUNDS as f64;
    assert!(
        (observed - predicted).abs() < 0.015,
        "observed {observed} vs predicted {predicted}"
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREVIEW AND PRESETS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_preview_after_tuning_shows_clean_column() {
    let mut config = GameConfig::classic();
    config.apply_target(TARGET_TOTAL).unwrap();

    let view = preview(
        &config.symbols,
        config.expected_round_total,
        config.pulls_per_round,
    );
    assert!(!view.drift_warning);
    assert!((view.total_percent - 100.0).abs() <= 0.05);
}

#[test]
fn test_yaml_preset_plays_out_of_the_box() {
    let config = GameConfig::from_yml_str(
        r#"
symbols:
  - id: seven
    label: "７"
    payout: 100.0
    prob: 60.0
  - id: bar
    label: BAR
    payout: 50.0
    prob: 40.0
pulls_per_round: 5
expected_round_total: 400.0
"#,
    )
    .unwrap();
    assert_eq!(config.reels, 3);

    let mut engine = RoundEngine::new(config).unwrap();
    engine.seed(SEED);
    let round = engine.play_round();
    // Only wins are possible, so five pulls pay at least 5 x 50.
    assert!(round.total_payout >= 250.0);
}
