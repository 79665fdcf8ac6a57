//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `LoyaltyEngine`, the single entry point the order
//! submitter calls once per approved order. It wires the pure assessment in
//! `domain::loyalty` to an injected `AccountStore`.

pub mod engine;
