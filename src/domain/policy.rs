use super::account::Tier;
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Lifetime-spend breakpoints that map a total to a tier.
///
/// A total sitting exactly on a breakpoint stays in the lower tier: the
/// comparison is strictly-greater-than. The schedule is carried inside
/// [`PurchaseUpdate`](super::ports::PurchaseUpdate) so stores can re-derive
/// the tier from the post-increment total, keeping tier consistent with
/// `total_spent` even when two orders for the same account race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSchedule {
    pub silver_above: Decimal,
    pub gold_above: Decimal,
}

impl TierSchedule {
    pub fn tier_for(&self, total_spent: Decimal) -> Tier {
        if total_spent > self.gold_above {
            Tier::Gold
        } else if total_spent > self.silver_above {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            silver_above: dec!(100),
            gold_above: dec!(500),
        }
    }
}

/// All tunable numbers of the loyalty program in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyPolicy {
    pub tiers: TierSchedule,
    pub bronze_rate: Decimal,
    pub silver_rate: Decimal,
    pub gold_rate: Decimal,
    /// Flat share of the order amount credited to the referrer, independent
    /// of either party's tier or founder status.
    pub referral_rate: Decimal,
    pub founder_multiplier: Decimal,
    pub founder_window_months: u32,
}

impl LoyaltyPolicy {
    pub fn rate_for(&self, tier: Tier) -> Decimal {
        match tier {
            Tier::Bronze => self.bronze_rate,
            Tier::Silver => self.silver_rate,
            Tier::Gold => self.gold_rate,
        }
    }

    /// Whether the founder multiplier applies at `now` for an account
    /// created at `created_at`. The window is one calendar month (per
    /// `founder_window_months`) and closes at its end instant: `now` must be
    /// strictly before it.
    pub fn founder_window_open(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match created_at.checked_add_months(Months::new(self.founder_window_months)) {
            Some(window_end) => now < window_end,
            None => false,
        }
    }
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        Self {
            tiers: TierSchedule::default(),
            bronze_rate: dec!(0.03),
            silver_rate: dec!(0.05),
            gold_rate: dec!(0.08),
            referral_rate: dec!(0.02),
            founder_multiplier: dec!(2),
            founder_window_months: 1,
        }
    }
}
