use crate::error::LoyaltyError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::ops::{Add, AddAssign};

/// Opaque account identifier, assigned by the external identity layer.
pub type AccountId = String;

/// Represents a non-negative monetary order amount.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce the engine's
/// input contract at the boundary: a negative order amount is rejected before
/// any account state is touched.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LoyaltyError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LoyaltyError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LoyaltyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

/// Accumulated monetary value (lifetime spend or wallet credit).
///
/// Within this engine balances are append-only: the only mutations in scope
/// are increments, so no subtraction operators are provided.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

/// Discrete loyalty level derived from lifetime spend.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Numeric rank (1..=3) as persisted and displayed.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Bronze => 1,
            Tier::Silver => 2,
            Tier::Gold => 3,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Tier::Bronze),
            2 => Some(Tier::Silver),
            3 => Some(Tier::Gold),
            _ => None,
        }
    }
}

impl Serialize for Tier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.rank())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rank = u8::deserialize(deserializer)?;
        Tier::from_rank(rank)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid tier rank: {rank}")))
    }
}

/// A customer (or admin) profile as held by the account store.
///
/// The engine only ever mutates `total_spent`, `tier` and `wallet_balance`;
/// everything else is set at account creation by the external identity layer
/// and treated as immutable here.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: AccountId,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub total_spent: Balance,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub wallet_balance: Balance,
    /// Referral code of the account that referred this one, if any.
    #[serde(default)]
    pub referred_by: Option<String>,
    /// Unique code other accounts may name in their `referred_by`.
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub is_founder: bool,
    /// Anchors the founder bonus window.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<AccountId>) -> Self {
        Self {
            id: id.into(),
            role: Role::Customer,
            total_spent: Balance::ZERO,
            tier: Tier::Bronze,
            wallet_balance: Balance::ZERO,
            referred_by: None,
            referral_code: None,
            is_founder: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
