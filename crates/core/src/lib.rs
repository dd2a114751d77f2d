//! Domain types, validation, and pure computation for the stockroom.
//!
//! This crate has no database or async dependencies. Everything here is
//! evaluated against data passed in by the caller, so the transactional
//! engine and the HTTP layer share one definition of the inventory rules.

pub mod approval;
pub mod audit;
pub mod category;
pub mod error;
pub mod inventory;
pub mod roles;
pub mod types;
