use crate::domain::account::{Account, Amount, Balance};
use crate::domain::loyalty::{self, LoyaltyResult, LoyaltyWarning};
use crate::domain::policy::LoyaltyPolicy;
use crate::domain::ports::{AccountStoreBox, PurchaseUpdate};
use crate::error::{LoyaltyError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// The loyalty ledger engine.
///
/// Processes one approved order at a time: resolves the purchaser, computes
/// tier and cashback through the pure assessment, persists both increments
/// through the injected store, and propagates the referral bonus. The caller
/// is responsible for invoking it exactly once per order; the engine keeps
/// no per-order state.
pub struct LoyaltyEngine {
    store: AccountStoreBox,
    policy: LoyaltyPolicy,
}

impl LoyaltyEngine {
    pub fn new(store: AccountStoreBox) -> Self {
        Self::with_policy(store, LoyaltyPolicy::default())
    }

    pub fn with_policy(store: AccountStoreBox, policy: LoyaltyPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &LoyaltyPolicy {
        &self.policy
    }

    /// Processes an approved order against the wall clock.
    pub async fn process_order(&self, account_id: &str, amount: Amount) -> Result<LoyaltyResult> {
        self.process_order_at(account_id, amount, Utc::now()).await
    }

    /// Processes an approved order at an explicit instant.
    ///
    /// A missing purchaser is the only fatal outcome; once the purchaser is
    /// resolved the computed numbers are always returned, with persistence
    /// failures reported through `LoyaltyResult::warnings`.
    pub async fn process_order_at(
        &self,
        account_id: &str,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<LoyaltyResult> {
        let account = self
            .store
            .get(account_id)
            .await?
            .ok_or_else(|| LoyaltyError::AccountNotFound(account_id.to_string()))?;

        // Admins accrue nothing, as purchaser or referrer.
        if account.is_admin() {
            debug!(account = %account.id, "admin purchase, no accrual");
            return Ok(LoyaltyResult {
                customer_cashback: Decimal::ZERO,
                referrer_bonus: Decimal::ZERO,
                new_tier: account.tier,
                warnings: Vec::new(),
            });
        }

        let assessment = loyalty::assess(&account, amount, now, &self.policy);
        if assessment.founder_boost {
            debug!(
                account = %account.id,
                rate = %assessment.effective_rate,
                "founder window open, rate doubled"
            );
        }

        let mut warnings = Vec::new();

        let update = PurchaseUpdate {
            spend_delta: Balance::from(amount),
            cashback: Balance::new(assessment.customer_cashback),
            tiers: self.policy.tiers,
        };
        if let Err(e) = self.store.apply_purchase(&account.id, update).await {
            warn!(account = %account.id, error = %e, "purchaser update failed");
            warnings.push(LoyaltyWarning::PurchaserUpdateFailed(e.to_string()));
        }

        let referrer_bonus = self
            .propagate_referral(&account, amount, &mut warnings)
            .await;

        info!(
            account = %account.id,
            amount = %amount.value(),
            cashback = %assessment.customer_cashback,
            referrer_bonus = %referrer_bonus,
            tier = assessment.new_tier.rank(),
            "order processed"
        );

        Ok(LoyaltyResult {
            customer_cashback: assessment.customer_cashback,
            referrer_bonus,
            new_tier: assessment.new_tier,
            warnings,
        })
    }

    /// Credits the flat referral share to the purchaser's referrer, if one
    /// exists and is not an admin. Missing or admin referrers are normal,
    /// silent outcomes; only a storage failure produces a warning. Never
    /// rolls back the already-applied purchaser update.
    async fn propagate_referral(
        &self,
        purchaser: &Account,
        amount: Amount,
        warnings: &mut Vec<LoyaltyWarning>,
    ) -> Decimal {
        let Some(code) = purchaser.referred_by.as_deref() else {
            return Decimal::ZERO;
        };

        let referrer = match self.store.find_by_referral_code(code).await {
            Ok(Some(referrer)) => referrer,
            Ok(None) => {
                debug!(account = %purchaser.id, code, "referrer not found, no bonus");
                return Decimal::ZERO;
            }
            Err(e) => {
                warn!(account = %purchaser.id, code, error = %e, "referrer lookup failed");
                warnings.push(LoyaltyWarning::ReferrerUpdateFailed(e.to_string()));
                return Decimal::ZERO;
            }
        };

        if referrer.is_admin() {
            debug!(account = %purchaser.id, code, "referrer is admin, no bonus");
            return Decimal::ZERO;
        }

        let bonus = amount.value() * self.policy.referral_rate;
        if let Err(e) = self.store.credit_wallet(&referrer.id, Balance::new(bonus)).await {
            warn!(referrer = %referrer.id, error = %e, "referrer credit failed");
            warnings.push(LoyaltyWarning::ReferrerUpdateFailed(e.to_string()));
        }
        bonus
    }

    /// Consumes the engine and returns the final state of all accounts.
    pub async fn into_results(self) -> Result<Vec<Account>> {
        self.store.all_accounts().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Role, Tier};
    use crate::domain::ports::AccountStore;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use rust_decimal_macros::dec;

    async fn engine_with(accounts: Vec<Account>) -> (LoyaltyEngine, InMemoryAccountStore) {
        let store = InMemoryAccountStore::new();
        for account in accounts {
            store.insert(account).await.unwrap();
        }
        let engine = LoyaltyEngine::new(Box::new(store.clone()));
        (engine, store)
    }

    #[tokio::test]
    async fn test_unknown_account_is_fatal() {
        let (engine, _store) = engine_with(vec![]).await;
        let result = engine
            .process_order("ghost", Amount::new(dec!(10)).unwrap())
            .await;
        assert!(matches!(result, Err(LoyaltyError::AccountNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_admin_purchaser_accrues_nothing() {
        let mut admin = Account::new("admin-1");
        admin.role = Role::Admin;
        admin.tier = Tier::Silver;
        let (engine, store) = engine_with(vec![admin]).await;

        let result = engine
            .process_order("admin-1", Amount::new(dec!(1000)).unwrap())
            .await
            .unwrap();
        assert_eq!(result.customer_cashback, Decimal::ZERO);
        assert_eq!(result.referrer_bonus, Decimal::ZERO);
        assert_eq!(result.new_tier, Tier::Silver);

        let stored = store.get("admin-1").await.unwrap().unwrap();
        assert_eq!(stored.total_spent, Balance::ZERO);
        assert_eq!(stored.wallet_balance, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_order_persists_spend_tier_and_cashback() {
        let (engine, store) = engine_with(vec![Account::new("c1")]).await;

        let result = engine
            .process_order("c1", Amount::new(dec!(150)).unwrap())
            .await
            .unwrap();
        assert_eq!(result.customer_cashback, dec!(7.50));
        assert_eq!(result.new_tier, Tier::Silver);
        assert!(result.is_clean());

        let stored = store.get("c1").await.unwrap().unwrap();
        assert_eq!(stored.total_spent, Balance::new(dec!(150)));
        assert_eq!(stored.wallet_balance, Balance::new(dec!(7.50)));
        assert_eq!(stored.tier, Tier::Silver);
    }

    #[tokio::test]
    async fn test_referral_bonus_credited() {
        let mut referrer = Account::new("ref");
        referrer.referral_code = Some("CODE-A".into());
        let mut buyer = Account::new("buyer");
        buyer.referred_by = Some("CODE-A".into());
        let (engine, store) = engine_with(vec![referrer, buyer]).await;

        let result = engine
            .process_order("buyer", Amount::new(dec!(50)).unwrap())
            .await
            .unwrap();
        assert_eq!(result.referrer_bonus, dec!(1.00));

        let stored = store.get("ref").await.unwrap().unwrap();
        assert_eq!(stored.wallet_balance, Balance::new(dec!(1.00)));
        // The referrer's own spend is untouched.
        assert_eq!(stored.total_spent, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_missing_referrer_is_silent() {
        let mut buyer = Account::new("buyer");
        buyer.referred_by = Some("NO-SUCH-CODE".into());
        let (engine, _store) = engine_with(vec![buyer]).await;

        let result = engine
            .process_order("buyer", Amount::new(dec!(50)).unwrap())
            .await
            .unwrap();
        assert_eq!(result.referrer_bonus, Decimal::ZERO);
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn test_admin_referrer_gets_no_bonus() {
        let mut referrer = Account::new("ref");
        referrer.role = Role::Admin;
        referrer.referral_code = Some("CODE-A".into());
        let mut buyer = Account::new("buyer");
        buyer.referred_by = Some("CODE-A".into());
        let (engine, store) = engine_with(vec![referrer, buyer]).await;

        let result = engine
            .process_order("buyer", Amount::new(dec!(50)).unwrap())
            .await
            .unwrap();
        assert_eq!(result.referrer_bonus, Decimal::ZERO);
        assert!(result.is_clean());

        let stored = store.get("ref").await.unwrap().unwrap();
        assert_eq!(stored.wallet_balance, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_referrer_bonus_is_flat_regardless_of_founder() {
        let mut referrer = Account::new("ref");
        referrer.referral_code = Some("CODE-A".into());
        let mut buyer = Account::new("buyer");
        buyer.referred_by = Some("CODE-A".into());
        buyer.is_founder = true;
        let (engine, _store) = engine_with(vec![referrer, buyer]).await;

        let result = engine
            .process_order("buyer", Amount::new(dec!(100)).unwrap())
            .await
            .unwrap();
        // Buyer's cashback is doubled; the referrer share is not.
        assert_eq!(result.customer_cashback, dec!(6.00));
        assert_eq!(result.referrer_bonus, dec!(2.00));
    }
}
