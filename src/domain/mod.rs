//! Domain layer: the account model, the loyalty policy, and the pure
//! assessment function, plus the storage ports the application layer
//! depends on.

pub mod account;
pub mod loyalty;
pub mod policy;
pub mod ports;
