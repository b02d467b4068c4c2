//! Exact round-total distribution by integer-grid convolution.
//!
//! Payouts with decimals are lifted onto an integer grid ([`decimal_scale`]),
//! the per-pull distribution is convolved once per pull, and threshold
//! queries read cumulative mass off the grid. Exact up to f64 addition, no
//! sampling involved.

use thiserror::Error;

/// Decimal digits the integer grid resolves before rounding onto the cap.
const MAX_SCALE_DIGITS: u32 = 9;

/// Hard cap on grid states; keeps hostile payout tables from allocating
/// gigabytes.
const MAX_STATES: usize = 5_000_000;

/// Grid construction failures.
#[derive(Debug, Error)]
pub enum PmfError {
    #[error("payout table is empty")]
    Empty,

    #[error("scaled state space too large: {states} states (max {MAX_STATES})")]
    TableTooLarge { states: usize },
}

/// Smallest power of ten that maps every value onto integers.
///
/// `12.5` → 10, whole numbers → 1. Capped at `10^9`; values needing more
/// digits are rounded onto that grid. Non-finite values are skipped.
pub fn decimal_scale(values: &[f64]) -> u64 {
    let mut digits = 0u32;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        let mut needed = MAX_SCALE_DIGITS;
        for k in 0..=MAX_SCALE_DIGITS {
            let scaled = v * 10f64.powi(k as i32);
            let tol = 1e-9 * scaled.abs().max(1.0);
            if (scaled - scaled.round()).abs() <= tol {
                needed = k;
                break;
            }
        }
        digits = digits.max(needed);
    }
    10u64.pow(digits)
}

/// Distribution of the total payout over a fixed number of pulls.
#[derive(Debug, Clone)]
pub struct TotalPmf {
    mass: Vec<f64>,
    scale: f64,
}

impl TotalPmf {
    /// Builds the PMF for `pulls` independent draws (`pulls` is clamped to
    /// at least 1).
    ///
    /// `weights` are relative draw weights; percent and fraction scales
    /// both work since normalization is internal. A zero weight sum
    /// normalizes against 1 and yields an all-zero distribution. The
    /// shorter of the two slices decides how many symbols take part, and
    /// negative payouts land on the zero bucket.
    pub fn new(payouts: &[f64], weights: &[f64], pulls: u32) -> Result<Self, PmfError> {
        if payouts.is_empty() || weights.is_empty() {
            return Err(PmfError::Empty);
        }
        let pulls = pulls.max(1) as usize;
        let sum: f64 = weights.iter().sum();
        let denom = if sum == 0.0 { 1.0 } else { sum };
        let probs: Vec<f64> = weights.iter().map(|w| w / denom).collect();

        let scale = decimal_scale(payouts) as f64;
        let grid: Vec<usize> = payouts
            .iter()
            .map(|&v| (v * scale).round().max(0.0) as usize)
            .collect();
        let max_step = grid.iter().copied().max().unwrap_or(0);
        let states = pulls * max_step + 1;
        if states > MAX_STATES {
            return Err(PmfError::TableTooLarge { states });
        }

        let mut mass = vec![0.0; states];
        mass[0] = 1.0;
        for _ in 0..pulls {
            let mut next = vec![0.0; states];
            for (total, &m) in mass.iter().enumerate() {
                if m == 0.0 {
                    continue;
                }
                for (&step, &p) in grid.iter().zip(&probs) {
                    next[total + step] += m * p;
                }
            }
            mass = next;
        }
        Ok(Self { mass, scale })
    }

    /// `P(total ≥ threshold)`.
    pub fn at_least(&self, threshold: f64) -> f64 {
        let idx = (threshold * self.scale - 1e-9).ceil().max(0.0) as usize;
        if idx >= self.mass.len() {
            return 0.0;
        }
        self.mass[idx..].iter().sum()
    }

    /// `P(total ≤ threshold)`.
    pub fn at_most(&self, threshold: f64) -> f64 {
        let scaled = (threshold * self.scale + 1e-9).floor();
        if scaled < 0.0 {
            return 0.0;
        }
        let idx = (scaled as usize).min(self.mass.len() - 1);
        self.mass[..=idx].iter().sum()
    }

    /// `P(lo ≤ total ≤ hi)`; a `hi` of `None` leaves the upper side open.
    pub fn between(&self, lo: f64, hi: Option<f64>) -> f64 {
        let ge = self.at_least(lo);
        let le = hi.map_or(1.0, |h| self.at_most(h));
        (le - (1.0 - ge)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decimal_scale() {
        assert_eq!(decimal_scale(&[100.0, 50.0, 5.0]), 1);
        assert_eq!(decimal_scale(&[12.5, 100.0]), 10);
        assert_eq!(decimal_scale(&[0.25]), 100);
    }

    #[test]
    fn test_single_symbol_is_certain() {
        let pmf = TotalPmf::new(&[10.0], &[100.0], 5).unwrap();
        assert_relative_eq!(pmf.at_least(50.0), 1.0);
        assert_relative_eq!(pmf.at_least(50.1), 0.0);
        assert_relative_eq!(pmf.at_most(50.0), 1.0);
        assert_relative_eq!(pmf.at_most(49.9), 0.0);
    }

    #[test]
    fn test_two_symbol_binomial() {
        // Coin flip between payouts 0 and 1 over 4 pulls: total is
        // Binomial(4, 0.5).
        let pmf = TotalPmf::new(&[0.0, 1.0], &[50.0, 50.0], 4).unwrap();
        assert_relative_eq!(pmf.at_least(4.0), 0.0625, epsilon = 1e-12);
        assert_relative_eq!(pmf.at_least(3.0), 0.3125, epsilon = 1e-12);
        assert_relative_eq!(pmf.at_most(0.0), 0.0625, epsilon = 1e-12);
    }

    #[test]
    fn test_fractional_payout_grid() {
        let pmf = TotalPmf::new(&[12.5, 0.0], &[1.0, 1.0], 2).unwrap();
        assert_relative_eq!(pmf.at_least(25.0), 0.25, epsilon = 1e-12);
        assert_relative_eq!(pmf.between(12.5, Some(12.5)), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_between_unbounded_matches_at_least() {
        let pmf = TotalPmf::new(&[5.0, 20.0], &[80.0, 20.0], 5).unwrap();
        assert_relative_eq!(pmf.between(40.0, None), pmf.at_least(40.0), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_threshold_is_certain() {
        let pmf = TotalPmf::new(&[5.0, 20.0], &[1.0, 1.0], 3).unwrap();
        assert_relative_eq!(pmf.at_least(-10.0), 1.0, epsilon = 1e-12);
        assert_eq!(pmf.at_most(-10.0), 0.0);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(TotalPmf::new(&[], &[], 5), Err(PmfError::Empty)));
    }

    #[test]
    fn test_state_cap() {
        let built = TotalPmf::new(&[123.456_789_012, 1.0], &[1.0, 1.0], 5);
        assert!(matches!(built, Err(PmfError::TableTooLarge { .. })));
    }

    #[test]
    fn test_zero_weights_zero_mass() {
        let pmf = TotalPmf::new(&[10.0, 5.0], &[0.0, 0.0], 3).unwrap();
        assert_eq!(pmf.at_least(0.0), 0.0);
    }
}
