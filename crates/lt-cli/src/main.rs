//! LuckyTilt Operator Console
//!
//! Usage:
//!   lucky-tilt init machine.json          - Write the classic machine
//!   lucky-tilt solve 500,100,50 -t 41.6   - Solve percents for raw payouts
//!   lucky-tilt preview machine.json       - Show the percent column
//!   lucky-tilt tune machine.json -t 250   - Tune to a round total
//!   lucky-tilt optimize machine.json      - Fit the config's band targets
//!   lucky-tilt odds machine.json --min 100
//!   lucky-tilt simulate machine.json --rounds 50000
//!   lucky-tilt play machine.json          - Play one round with its timeline

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use lt_engine::{
    apply_range_targets, generate_timeline, preview, simulate, GameConfig, OptimizerSettings,
    RoundEngine, TimingConfig,
};

#[derive(Parser)]
#[command(name = "lucky-tilt", about = "LuckyTilt machine tuning and verification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the classic machine config
    Init {
        /// Destination path (.json, .yml)
        path: PathBuf,
    },
    /// Solve display percents for a comma-separated payout list
    Solve {
        /// Payouts, e.g. 500,100,50,20,12,8,5
        payouts: String,
        /// Per-pull expectation to hit
        #[arg(short, long)]
        target: f64,
    },
    /// Show the percent column a config's target produces
    Preview {
        config: PathBuf,
    },
    /// Tune a config's percents to a round-total target
    Tune {
        config: PathBuf,
        /// Expected round total to hit
        #[arg(short, long)]
        target: f64,
        /// Write the tuned config back
        #[arg(long)]
        save: bool,
    },
    /// Fit the config's payout-band share targets
    Optimize {
        config: PathBuf,
        /// Write the optimized config back
        #[arg(long)]
        save: bool,
    },
    /// Odds of the round total landing in a range
    Odds {
        config: PathBuf,
        /// Lower bound (inclusive)
        #[arg(long)]
        min: f64,
        /// Upper bound (inclusive); omit for open-ended
        #[arg(long)]
        max: Option<f64>,
        /// Pulls per round, defaults to the config's value
        #[arg(long)]
        pulls: Option<u32>,
    },
    /// Play seeded rounds and report realized statistics
    Simulate {
        config: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        rounds: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play one round and print its presentation timeline
    Play {
        config: PathBuf,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Use the fast attract-loop pacing
        #[arg(long)]
        turbo: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => run_init(&path),
        Commands::Solve { payouts, target } => run_solve(&payouts, target),
        Commands::Preview { config } => run_preview(&config),
        Commands::Tune {
            config,
            target,
            save,
        } => run_tune(&config, target, save),
        Commands::Optimize { config, save } => run_optimize(&config, save),
        Commands::Odds {
            config,
            min,
            max,
            pulls,
        } => run_odds(&config, min, max, pulls),
        Commands::Simulate {
            config,
            rounds,
            seed,
            json,
        } => run_simulate(&config, rounds, seed, json),
        Commands::Play {
            config,
            seed,
            turbo,
        } => run_play(&config, seed, turbo),
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

fn load_config(path: &Path) -> Result<GameConfig> {
    if !path.exists() {
        bail!("no config at {}", path.display());
    }
    if is_yaml(path) {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(GameConfig::from_yml_str(&content)?)
    } else {
        Ok(GameConfig::load_from(path))
    }
}

fn save_config(config: &GameConfig, path: &Path) -> Result<()> {
    if is_yaml(path) {
        fs::write(path, config.to_yml_string()?)
            .with_context(|| format!("writing {}", path.display()))?;
    } else {
        config.save_to(path)?;
    }
    println!("saved {}", path.display());
    Ok(())
}

fn print_percent_column(config: &GameConfig) {
    println!("{:<10} {:>10} {:>10}", "symbol", "payout", "percent");
    for sym in config.symbols.iter() {
        println!("{:<10} {:>10.2} {:>9.4}%", sym.id, sym.payout, sym.prob);
    }
    println!("expected round total {:.2}", config.expected_round_total);
}

fn run_init(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite {}", path.display());
    }
    save_config(&GameConfig::classic(), path)
}

fn run_solve(payouts: &str, target: f64) -> Result<()> {
    let payouts: Vec<f64> = payouts
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("bad payout `{}`", s.trim()))
        })
        .collect::<Result<_>>()?;
    let probs = lt_math::solve_for_target(&payouts, target);
    println!("{:>10} {:>10}", "payout", "percent");
    for (payout, prob) in payouts.iter().zip(&probs) {
        println!("{payout:>10.2} {:>9.4}%", prob * 100.0);
    }
    println!(
        "expectation {:.4}",
        lt_math::expectation(&payouts, &probs)
    );
    Ok(())
}

fn run_preview(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let view = preview(
        &config.symbols,
        config.expected_round_total,
        config.pulls_per_round,
    );
    println!("{:<10} {:>10} {:>10}", "symbol", "payout", "percent");
    for row in &view.rows {
        println!("{:<10} {:>10.2} {:>9.4}%", row.id, row.payout, row.percent);
    }
    println!("total {:.4}%", view.total_percent);
    if view.drift_warning {
        println!("warning: percents drift from 100 by more than 0.05");
    }
    Ok(())
}

fn run_tune(path: &Path, target: f64, save: bool) -> Result<()> {
    let mut config = load_config(path)?;
    config.apply_target(target)?;
    print_percent_column(&config);
    if save {
        save_config(&config, path)?;
    }
    Ok(())
}

fn run_optimize(path: &Path, save: bool) -> Result<()> {
    let mut config = load_config(path)?;
    if config.range_targets.is_empty() {
        bail!("config has no range targets to fit");
    }
    let outcome = apply_range_targets(&mut config, &OptimizerSettings::default())?;
    println!(
        "{} iteration(s), error {:.3}{}",
        outcome.iterations,
        outcome.error,
        if outcome.converged {
            ""
        } else {
            " (not converged)"
        }
    );
    print_percent_column(&config);
    if save {
        save_config(&config, path)?;
    }
    Ok(())
}

fn run_odds(path: &Path, min: f64, max: Option<f64>, pulls: Option<u32>) -> Result<()> {
    let config = load_config(path)?;
    let pulls = pulls.unwrap_or(config.pulls_per_round);
    let pmf = config.total_pmf(pulls)?;
    let p = pmf.between(min, max);
    match max {
        Some(max) => println!(
            "P({min} <= total <= {max}) over {pulls} pull(s) = {:.4}%",
            p * 100.0
        ),
        None => println!("P(total >= {min}) over {pulls} pull(s) = {:.4}%", p * 100.0),
    }
    Ok(())
}

fn run_simulate(path: &Path, rounds: u64, seed: u64, json: bool) -> Result<()> {
    let config = load_config(path)?;
    let report = simulate(&config, rounds, seed)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "{} round(s), mean total {:.2} (expected {:.2})",
        report.rounds, report.mean_round_total, report.expected_round_total
    );
    println!(
        "hit {:.2}%  near miss {:.2}%  miss {:.2}%",
        report.hit_rate, report.near_miss_rate, report.miss_rate
    );
    for bucket in &report.histogram {
        println!("{:>9}  {}", bucket.label, bucket.count);
    }
    for (rank, count) in &report.prize_counts {
        println!("prize rank {rank}: {count} round(s)");
    }
    Ok(())
}

fn run_play(path: &Path, seed: u64, turbo: bool) -> Result<()> {
    let config = load_config(path)?;
    let mut engine = RoundEngine::new(config)?;
    engine.seed(seed);
    let round = engine.play_round();
    let timing = if turbo {
        TimingConfig::turbo()
    } else {
        TimingConfig::standard()
    };
    for event in generate_timeline(&round, &timing) {
        println!(
            "{:>8.0}ms  {}",
            event.timestamp_ms,
            serde_json::to_string(&event.stage)?
        );
    }
    println!("total payout {:.2}", round.total_payout);
    if let Some(prize) = &round.prize {
        println!("prize: {} (rank {})", prize.name, prize.rank);
    }
    Ok(())
}
