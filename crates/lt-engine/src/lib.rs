//! # LuckyTilt Engine
//!
//! Round engine for kiosk promo slots: three reels, one payline, five pulls
//! per round, a prize on the round total. Operators set payouts and a target
//! expected total; the engine does the rest.
//!
//! ## Features
//!
//! - **Symbol tables** with paying and teaser (forced near-miss) symbols
//! - **Target tuning**: exponential-tilt solve with miss-rate adjustment,
//!   inverse-proportional fallback when no target is set
//! - **Probability preview** with percent rounding and drift warning
//! - **Round generation**: seeded RNG, weighted draws, miss / near-miss /
//!   win branches, session stats
//! - **Prize ladder** lookup on the round total
//! - **Presentation timeline**: timestamped stage events for clients
//! - **Range-share optimizer** and **batch simulation** for verification
//!
//! ## Architecture
//!
//! ```text
//! GameConfig ──► RoundEngine ──► RoundResult ──► timeline events
//!     │               │              │
//!     │  (lt-math)    └─ SessionStats└─ PrizeTable
//!     ├─ apply_target / recalc_inverse
//!     ├─ preview (display percents)
//!     └─ TotalPmf (threshold odds)
//! ```

pub mod config;
pub mod error;
pub mod optimizer;
pub mod preview;
pub mod prize;
pub mod round;
pub mod simulate;
pub mod symbols;
pub mod timeline;

pub use config::*;
pub use error::*;
pub use optimizer::*;
pub use preview::*;
pub use prize::*;
pub use round::*;
pub use simulate::*;
pub use symbols::*;
pub use timeline::*;
