//! Operator-facing probability preview: what the percent column will show
//! for a given expected round total, before anything is committed.

use serde::Serialize;

use crate::symbols::SymbolTable;

/// Rounded percent sums further than this from 100 get flagged.
pub const DRIFT_TOLERANCE: f64 = 0.05;

/// One row of the preview table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub id: String,
    pub label: String,
    pub payout: f64,
    /// Percent rounded to four decimals, as displayed
    pub percent: f64,
}

/// Preview of the percent column plus a drift check on the rounded sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityPreview {
    pub rows: Vec<PreviewRow>,
    /// Sum of the rounded percents
    pub total_percent: f64,
    /// True when the rounded sum drifts more than [`DRIFT_TOLERANCE`]
    /// from 100. Tied boundary targets surface here, not as an error.
    pub drift_warning: bool,
}

/// Solves for `expected_round_total` and renders the resulting percents
/// the way the edit screen would. A non-positive target falls back to
/// inverse-proportional weighting. Negative payouts are clamped to 0 at
/// this boundary; the solver itself sees only sane input.
pub fn preview(table: &SymbolTable, expected_round_total: f64, pulls: u32) -> ProbabilityPreview {
    let payouts: Vec<f64> = table.payouts().iter().map(|&v| v.max(0.0)).collect();
    let per_pull = expected_round_total / f64::from(pulls.max(1));
    let probs = if expected_round_total > 0.0 {
        lt_math::solve_for_target(&payouts, per_pull)
    } else {
        lt_math::inverse_proportional(&payouts)
    };

    let rows: Vec<PreviewRow> = table
        .iter()
        .zip(&probs)
        .map(|(sym, &p)| PreviewRow {
            id: sym.id.clone(),
            label: sym.label.clone(),
            payout: sym.payout,
            percent: round4(p * 100.0),
        })
        .collect();
    let total_percent: f64 = rows.iter().map(|r| r.percent).sum();
    let drift_warning = (total_percent - 100.0).abs() > DRIFT_TOLERANCE;
    if drift_warning {
        log::warn!("preview percents sum to {total_percent:.4}, not 100");
    }
    ProbabilityPreview {
        rows,
        total_percent,
        drift_warning,
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
