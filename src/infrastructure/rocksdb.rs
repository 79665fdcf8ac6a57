use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::ports::{AccountStore, PurchaseUpdate};
use crate::error::{LoyaltyError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing account profiles.
pub const CF_ACCOUNTS: &str = "accounts";

/// A persistent account store using RocksDB.
///
/// Accounts are stored as JSON values keyed by account id in their own
/// column family. RocksDB offers no multi-key read-modify-write primitive in
/// the bindings used here, so the increment operations serialize through a
/// store-level async mutex; this keeps concurrent purchases against the same
/// account from losing updates.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbAccountStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbAccountStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the accounts column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_ACCOUNTS)
            .ok_or_else(|| LoyaltyError::Storage("accounts column family not found".to_string()))
    }

    fn read(&self, id: &str) -> Result<Option<Account>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, account: &Account) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(account)?;
        self.db.put_cf(cf, account.id.as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for RocksDbAccountStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(&account)
    }

    async fn get(&self, id: &str) -> Result<Option<Account>> {
        self.read(id)
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Account>> {
        for account in self.all_accounts().await? {
            if account.referral_code.as_deref() == Some(code) {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    async fn apply_purchase(&self, id: &AccountId, update: PurchaseUpdate) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut account = self
            .read(id)?
            .ok_or_else(|| LoyaltyError::AccountNotFound(id.clone()))?;
        account.total_spent += update.spend_delta;
        account.wallet_balance += update.cashback;
        account.tier = update.tiers.tier_for(account.total_spent.0);
        self.write(&account)
    }

    async fn credit_wallet(&self, id: &AccountId, bonus: Balance) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut account = self
            .read(id)?
            .ok_or_else(|| LoyaltyError::AccountNotFound(id.clone()))?;
        account.wallet_balance += bonus;
        self.write(&account)
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let cf = self.cf()?;
        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let account: Account = serde_json::from_slice(&value)?;
            accounts.push(account);
        }
        Ok(accounts)
    }
}
