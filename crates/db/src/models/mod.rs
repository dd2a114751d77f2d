//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create / update DTOs for inserts and patches
//! - Query parameter structs for filtered listings

use serde::Serialize;

pub mod approval;
pub mod category;
pub mod inbound;
pub mod item;
pub mod operation_log;
pub mod outbound;
pub mod stats;

/// One page of a filtered listing plus the unpaginated match count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
