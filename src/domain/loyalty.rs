use super::account::{Account, Amount, Tier};
use super::policy::LoyaltyPolicy;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Outcome of processing one order, as reported back to the caller.
///
/// The numbers are always the computed values, even when a persistence step
/// failed; `warnings` carries the failures so the caller can render a
/// "credited, but may be delayed" style outcome instead of an error page.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyResult {
    pub customer_cashback: Decimal,
    pub referrer_bonus: Decimal,
    pub new_tier: Tier,
    pub warnings: Vec<LoyaltyWarning>,
}

impl LoyaltyResult {
    /// True when every mutation was persisted.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Partial-persistence outcomes. The purchaser update and the referrer
/// credit are separable sub-transactions: a failure in one never rolls back
/// the other.
#[derive(Debug, Clone, PartialEq)]
pub enum LoyaltyWarning {
    PurchaserUpdateFailed(String),
    ReferrerUpdateFailed(String),
}

/// The side-effect-free part of an order's loyalty processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub new_total_spent: Decimal,
    pub new_tier: Tier,
    pub effective_rate: Decimal,
    pub customer_cashback: Decimal,
    /// Whether the founder multiplier was applied to the rate.
    pub founder_boost: bool,
}

/// Computes the tier and cashback an order earns, without touching storage.
///
/// Tier and base rate are resolved from the post-order lifetime spend. The
/// founder multiplier doubles the rate while the account's founder window is
/// open, but never changes the tier itself.
pub fn assess(
    account: &Account,
    amount: Amount,
    now: DateTime<Utc>,
    policy: &LoyaltyPolicy,
) -> Assessment {
    let new_total_spent = account.total_spent.0 + amount.value();
    let new_tier = policy.tiers.tier_for(new_total_spent);
    let base_rate = policy.rate_for(new_tier);

    let founder_boost = account.is_founder && policy.founder_window_open(account.created_at, now);
    let effective_rate = if founder_boost {
        base_rate * policy.founder_multiplier
    } else {
        base_rate
    };

    Assessment {
        new_total_spent,
        new_tier,
        effective_rate,
        customer_cashback: amount.value() * effective_rate,
        founder_boost,
    }
}
