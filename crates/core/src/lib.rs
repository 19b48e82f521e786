//! Core business logic for the Seashore ledger.
//!
//! This crate holds the domain rules of the general ledger and no database
//! code. Persistence is reached through the storage traits in
//! [`ledger::store`]; `seashore-db` implements them over Postgres.
//!
//! # Modules
//!
//! - `ledger` - Double-entry posting for loans, savings and fees

pub mod ledger;
