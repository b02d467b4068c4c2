//! Prize ladder: round-total thresholds to named awards.

use serde::{Deserialize, Serialize};

/// One ladder rung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    /// Ladder position, 1 = top prize
    pub rank: u32,
    /// Display name
    pub name: String,
    /// Minimum round total that lands this tier
    pub min_score: f64,
}

/// Prize ladder keyed on minimum score.
///
/// Construction sorts descending by `min_score` so exported JSON reads top
/// down; lookup itself is order-independent and survives hand-edited
/// files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable {
    tiers: Vec<PrizeTier>,
}

impl PrizeTable {
    pub fn new(mut tiers: Vec<PrizeTier>) -> Self {
        tiers.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));
        Self { tiers }
    }

    /// The ladder shipped with the classic symbol table.
    pub fn classic() -> Self {
        Self::new(vec![
            PrizeTier {
                rank: 1,
                name: "Gold".to_string(),
                min_score: 1500.0,
            },
            PrizeTier {
                rank: 2,
                name: "Silver".to_string(),
                min_score: 500.0,
            },
            PrizeTier {
                rank: 3,
                name: "Bronze".to_string(),
                min_score: 100.0,
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrizeTier> {
        self.tiers.iter()
    }

    /// Highest tier whose `min_score` the score reaches, `None` below all
    /// of them. Ties keep the earlier entry.
    pub fn award_for(&self, score: f64) -> Option<&PrizeTier> {
        self.tiers
            .iter()
            .filter(|t| score >= t.min_score)
            .fold(None, |best: Option<&PrizeTier>, tier| match best {
                Some(b) if b.min_score >= tier.min_score => Some(b),
                _ => Some(tier),
            })
    }
}
