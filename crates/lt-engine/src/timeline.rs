//! Flat presentation timeline for a played round.
//!
//! The engine decides outcomes up front; this module lays them out on a
//! clock so any frontend can replay the round without touching game
//! logic. Every event carries an absolute timestamp from round start.

use serde::{Deserialize, Serialize};

use crate::round::{PullOutcome, RoundResult};

/// Delays and thresholds for staging a round, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Spin start to the first reel stopping
    pub spin_lead_ms: f64,
    /// Gap between consecutive reel stops
    pub stop_gap_ms: f64,
    /// Extra hold before the third reel when a cue plays
    pub cue_hold_ms: f64,
    /// Last stop to the pull resolving, uncued
    pub settle_ms: f64,
    /// Last stop to the pull resolving after a cue
    pub cue_settle_ms: f64,
    /// Wins at or above this payout get the anticipation cue
    pub cue_min_payout: f64,
    /// Wins at or above this payout get the fanfare
    pub fanfare_min_payout: f64,
}

impl TimingConfig {
    /// Cabinet pacing.
    pub fn standard() -> Self {
        Self {
            spin_lead_ms: 500.0,
            stop_gap_ms: 420.0,
            cue_hold_ms: 600.0,
            settle_ms: 700.0,
            cue_settle_ms: 1500.0,
            cue_min_payout: 50.0,
            fanfare_min_payout: 50.0,
        }
    }

    /// Fast pacing for attract loops and soak tests.
    pub fn turbo() -> Self {
        Self {
            spin_lead_ms: 200.0,
            stop_gap_ms: 160.0,
            cue_hold_ms: 240.0,
            settle_ms: 280.0,
            cue_settle_ms: 600.0,
            ..Self::standard()
        }
    }

    /// Scales every delay, leaving the payout thresholds alone.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            spin_lead_ms: self.spin_lead_ms * factor,
            stop_gap_ms: self.stop_gap_ms * factor,
            cue_hold_ms: self.cue_hold_ms * factor,
            settle_ms: self.settle_ms * factor,
            cue_settle_ms: self.cue_settle_ms * factor,
            ..self.clone()
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// What happens at a timeline instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundStage {
    SpinStart { pull: u32 },
    ReelStop { pull: u32, reel: u8 },
    /// Third reel held while two of a kind show
    AnticipationCue { pull: u32, symbol: String },
    PullResolved { pull: u32, payout: f64 },
    Fanfare { pull: u32, symbol: String, payout: f64 },
    RoundEnd { total: f64 },
}

/// A stage pinned to its absolute time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub stage: RoundStage,
    pub timestamp_ms: f64,
}

/// Lays a played round out on the clock.
///
/// A pull is cued when it is a near miss or a win at or above
/// `cue_min_payout`: the first two stops show a pair, the cue fires, and
/// the third reel holds for `cue_hold_ms` before stopping into the longer
/// `cue_settle_ms`. Uncued pulls stop all three reels at `stop_gap_ms`
/// and resolve after `settle_ms`. Pulls chain back to back.
pub fn generate_timeline(round: &RoundResult, timing: &TimingConfig) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    let mut t = 0.0;
    for (i, pull) in round.pulls.iter().enumerate() {
        let pull_no = i as u32;
        events.push(TimelineEvent {
            stage: RoundStage::SpinStart { pull: pull_no },
            timestamp_ms: t,
        });
        t += timing.spin_lead_ms;
        events.push(TimelineEvent {
            stage: RoundStage::ReelStop {
                pull: pull_no,
                reel: 0,
            },
            timestamp_ms: t,
        });
        t += timing.stop_gap_ms;
        events.push(TimelineEvent {
            stage: RoundStage::ReelStop {
                pull: pull_no,
                reel: 1,
            },
            timestamp_ms: t,
        });

        let cued = match &pull.outcome {
            PullOutcome::NearMiss { .. } => true,
            PullOutcome::Win { payout, .. } => *payout >= timing.cue_min_payout,
            PullOutcome::Miss => false,
        };
        if cued {
            events.push(TimelineEvent {
                stage: RoundStage::AnticipationCue {
                    pull: pull_no,
                    symbol: pull.reels[0].id.clone(),
                },
                timestamp_ms: t,
            });
            t += timing.cue_hold_ms;
        } else {
            t += timing.stop_gap_ms;
        }
        events.push(TimelineEvent {
            stage: RoundStage::ReelStop {
                pull: pull_no,
                reel: 2,
            },
            timestamp_ms: t,
        });

        t += if cued {
            timing.cue_settle_ms
        } else {
            timing.settle_ms
        };
        events.push(TimelineEvent {
            stage: RoundStage::PullResolved {
                pull: pull_no,
                payout: pull.payout(),
            },
            timestamp_ms: t,
        });
        if let PullOutcome::Win { symbol, payout } = &pull.outcome {
            if *payout >= timing.fanfare_min_payout {
                events.push(TimelineEvent {
                    stage: RoundStage::Fanfare {
                        pull: pull_no,
                        symbol: symbol.clone(),
                        payout: *payout,
                    },
                    timestamp_ms: t,
                });
            }
        }
    }
    events.push(TimelineEvent {
        stage: RoundStage::RoundEnd {
            total: round.total_payout,
        },
        timestamp_ms: t,
    });
    events
}
