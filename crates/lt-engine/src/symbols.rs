//! Symbol definitions and the operator-facing symbol table.

use serde::{Deserialize, Serialize};

/// One reel symbol as the operator configures it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Stable identifier, unique within a table
    pub id: String,
    /// Display text (emoji and wide glyphs are fine)
    pub label: String,
    /// Payout in credits for three of a kind
    pub payout: f64,
    /// Display color hint, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Per-pull probability, stored in percent
    #[serde(default)]
    pub prob: f64,
    /// Teasers never pay; drawing one forces a near miss
    #[serde(default)]
    pub near_miss: bool,
    /// Paying symbol a teaser shows on reels 1-2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimics: Option<String>,
}

impl SymbolDef {
    /// Regular paying symbol.
    pub fn paying(id: &str, label: &str, payout: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            payout,
            color: None,
            prob: 0.0,
            near_miss: false,
            mimics: None,
        }
    }

    /// Teaser symbol that shows `mimics` on reels 1-2 and resolves to a
    /// near miss.
    pub fn teaser(id: &str, label: &str, mimics: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            payout: 0.0,
            color: None,
            prob: 0.0,
            near_miss: true,
            mimics: Some(mimics.to_string()),
        }
    }

    /// Set the display color.
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Set the per-pull probability in percent.
    pub fn with_prob(mut self, percent: f64) -> Self {
        self.prob = percent;
        self
    }
}

/// Ordered symbol list plus the vector views the math layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    pub symbols: Vec<SymbolDef>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<SymbolDef>) -> Self {
        Self { symbols }
    }

    /// The shipped seven-symbol table, payouts 500 down to 5. Percents are
    /// the inverse-proportional weighting of those payouts.
    pub fn classic() -> Self {
        Self::new(vec![
            SymbolDef::paying("GOD", "GOD", 500.0)
                .with_color("#ff8800")
                .with_prob(0.4079),
            SymbolDef::paying("seven", "７", 100.0)
                .with_color("#ff0000")
                .with_prob(2.0394),
            SymbolDef::paying("bar", "BAR", 50.0)
                .with_color("#0066ff")
                .with_prob(4.0789),
            SymbolDef::paying("bell", "🔔", 20.0)
                .with_color("#8b4513")
                .with_prob(10.1971),
            SymbolDef::paying("grape", "🍇", 12.0)
                .with_color("#9370db")
                .with_prob(16.9952),
            SymbolDef::paying("cherry", "🍒", 8.0)
                .with_color("#ff0000")
                .with_prob(25.4929),
            SymbolDef::paying("lemon", "🍋", 5.0)
                .with_color("#ffff00")
                .with_prob(40.7886),
        ])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymbolDef> {
        self.symbols.iter()
    }

    /// Look a symbol up by id.
    pub fn find(&self, id: &str) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Payout vector in table order.
    pub fn payouts(&self) -> Vec<f64> {
        self.symbols.iter().map(|s| s.payout).collect()
    }

    /// Percent vector in table order.
    pub fn percents(&self) -> Vec<f64> {
        self.symbols.iter().map(|s| s.prob).collect()
    }

    /// Sum of the stored percents.
    pub fn total_percent(&self) -> f64 {
        self.symbols.iter().map(|s| s.prob).sum()
    }

    /// Write percents back in table order; extra entries are ignored.
    pub fn set_percents(&mut self, percents: &[f64]) {
        for (sym, &pct) in self.symbols.iter_mut().zip(percents) {
            sym.prob = pct;
        }
    }

    /// Rescale stored percents to sum 100 (all-zero tables stay as they
    /// are).
    pub fn normalize_percents(&mut self) {
        let normalized = lt_math::normalize_percent(&self.percents());
        self.set_percents(&normalized);
    }

    /// Paying symbols, in table order.
    pub fn paying(&self) -> Vec<&SymbolDef> {
        self.symbols.iter().filter(|s| !s.near_miss).collect()
    }

    /// Teaser symbols, in table order.
    pub fn teasers(&self) -> Vec<&SymbolDef> {
        self.symbols.iter().filter(|s| s.near_miss).collect()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::classic()
    }
}
