use super::account::{Account, AccountId, Balance};
use super::policy::TierSchedule;
use crate::error::Result;
use async_trait::async_trait;

/// Increments to apply to a purchaser in one critical section.
///
/// The store adds both deltas and re-derives the tier from the resulting
/// `total_spent` using the carried schedule, so the tier/spend invariant
/// holds even when two orders for the same account are applied concurrently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseUpdate {
    pub spend_delta: Balance,
    pub cashback: Balance,
    pub tiers: TierSchedule,
}

/// Storage port for account profiles.
///
/// `apply_purchase` and `credit_wallet` must be serialized per account
/// (lock, compare-and-swap, or an atomic increment expression) rather than
/// read-then-write-full-value, so concurrent orders never lose updates.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts or replaces an account record. Account creation belongs to
    /// the external identity layer; the engine itself never calls this.
    async fn insert(&self, account: Account) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Account>>;
    /// Resolves a referrer by its `referral_code`.
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Account>>;
    /// Atomically applies a purchase: `total_spent += spend_delta`,
    /// `wallet_balance += cashback`, tier re-derived from the new total.
    async fn apply_purchase(&self, id: &AccountId, update: PurchaseUpdate) -> Result<()>;
    /// Atomically increments an account's wallet balance.
    async fn credit_wallet(&self, id: &AccountId, bonus: Balance) -> Result<()>;
    async fn all_accounts(&self) -> Result<Vec<Account>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
