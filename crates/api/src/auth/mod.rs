//! Authentication primitives.
//!
//! - [`jwt`] -- access-token validation (and generation, used by tooling and tests).
//!
//! Users and login live in a separate identity service; this crate only
//! verifies the tokens it issues.

pub mod jwt;
