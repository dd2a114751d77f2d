//! Engine configuration.

use std::fmt;
use std::str::FromStr;

/// Default per-transaction lock wait in milliseconds.
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// What deleting an item that still holds stock does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemDeletePolicy {
    /// Delete anyway, logging a warning and recording the lost quantity.
    #[default]
    AuditOnly,
    /// Refuse with `Conflict` while `current_quantity > 0`.
    RejectWithStock,
}

impl FromStr for ItemDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audit_only" => Ok(Self::AuditOnly),
            "reject_with_stock" => Ok(Self::RejectWithStock),
            other => Err(format!(
                "Invalid item delete policy '{other}'. Must be audit_only or reject_with_stock"
            )),
        }
    }
}

impl fmt::Display for ItemDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AuditOnly => "audit_only",
            Self::RejectWithStock => "reject_with_stock",
        })
    }
}

/// Tunables shared by every engine component.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// `lock_timeout` applied to each mutating transaction.
    pub lock_timeout_ms: u64,
    pub item_delete_policy: ItemDeletePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            item_delete_policy: ItemDeletePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default      |
    /// |----------------------|--------------|
    /// | `LOCK_TIMEOUT_MS`    | `5000`       |
    /// | `ITEM_DELETE_POLICY` | `audit_only` |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but cannot be parsed.
    pub fn from_env() -> Self {
        let lock_timeout_ms: u64 = std::env::var("LOCK_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_LOCK_TIMEOUT_MS.to_string())
            .parse()
            .expect("LOCK_TIMEOUT_MS must be a valid u64");

        let item_delete_policy = std::env::var("ITEM_DELETE_POLICY")
            .ok()
            .map(|v| v.parse::<ItemDeletePolicy>())
            .transpose()
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_default();

        Self {
            lock_timeout_ms,
            item_delete_policy,
        }
    }
}
