#![allow(dead_code)]

use loyalty_ledger::application::engine::LoyaltyEngine;
use loyalty_ledger::domain::account::Account;
use loyalty_ledger::domain::ports::AccountStore;
use loyalty_ledger::infrastructure::in_memory::InMemoryAccountStore;

pub fn customer(id: &str) -> Account {
    Account::new(id)
}

pub fn referrer(id: &str, code: &str) -> Account {
    let mut account = Account::new(id);
    account.referral_code = Some(code.to_string());
    account
}

pub fn referred(id: &str, code: &str) -> Account {
    let mut account = Account::new(id);
    account.referred_by = Some(code.to_string());
    account
}

/// Builds an engine over a fresh in-memory store seeded with `accounts`,
/// returning a second handle to the store for assertions.
pub async fn seeded_engine(accounts: Vec<Account>) -> (LoyaltyEngine, InMemoryAccountStore) {
    let store = InMemoryAccountStore::new();
    for account in accounts {
        store.insert(account).await.unwrap();
    }
    let engine = LoyaltyEngine::new(Box::new(store.clone()));
    (engine, store)
}
