use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::ports::{AccountStore, PurchaseUpdate};
use crate::error::{LoyaltyError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for account profiles.
///
/// Uses `Arc<RwLock<HashMap<AccountId, Account>>>` to allow shared concurrent
/// access. The increment operations mutate in place under the write lock, so
/// concurrent purchases against the same account never lose updates.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.referral_code.as_deref() == Some(code))
            .cloned())
    }

    async fn apply_purchase(&self, id: &AccountId, update: PurchaseUpdate) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| LoyaltyError::AccountNotFound(id.clone()))?;
        account.total_spent += update.spend_delta;
        account.wallet_balance += update.cashback;
        // Tier derived from the post-increment total, not the engine's read.
        account.tier = update.tiers.tier_for(account.total_spent.0);
        Ok(())
    }

    async fn credit_wallet(&self, id: &AccountId, bonus: Balance) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| LoyaltyError::AccountNotFound(id.clone()))?;
        account.wallet_balance += bonus;
        Ok(())
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}
