//! Approval request states and the deferred-intent payload.
//!
//! A request is stored with an opaque JSON document. On the way in and on
//! the way out it is parsed into [`ApprovalPayload`] so that replaying an
//! approved request is an exhaustive match over known shapes.
//!
//! Inbound payloads are tagged by a `mode` field:
//!
//! | `mode`             | Variant                          |
//! |--------------------|----------------------------------|
//! | `create_unique`    | [`InboundIntent::CreateUnique`]  |
//! | `update_stackable` | [`InboundIntent::UpdateStackable`] |
//! | *(absent)*         | [`InboundIntent::Legacy`]        |
//!
//! Outbound payloads have a single shape, [`StockOut`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::CoreError;
use crate::inventory::{validate_quantity, NewUniqueItem, StockIn, StockOut};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// All valid approval status strings.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

pub const REQUEST_INBOUND: &str = "inbound";
pub const REQUEST_OUTBOUND: &str = "outbound";

pub const MODE_CREATE_UNIQUE: &str = "create_unique";
pub const MODE_UPDATE_STACKABLE: &str = "update_stackable";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of an approval request. Non-pending states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_APPROVED => Ok(Self::Approved),
            STATUS_REJECTED => Ok(Self::Rejected),
            _ => Err(CoreError::BadRequest(format!(
                "Invalid approval status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Approved => STATUS_APPROVED,
            Self::Rejected => STATUS_REJECTED,
        }
    }

    /// Terminal status produced by a review decision.
    pub fn from_decision(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Rejected
        }
    }
}

/// Fail with `Conflict` unless the stored status is still pending.
pub fn ensure_reviewable(status: &str) -> Result<(), CoreError> {
    if status != STATUS_PENDING {
        return Err(CoreError::Conflict(format!(
            "Request has already been reviewed (status: {status})"
        )));
    }
    Ok(())
}

/// Which engine an approval request defers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Inbound,
    Outbound,
}

impl RequestType {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            REQUEST_INBOUND => Ok(Self::Inbound),
            REQUEST_OUTBOUND => Ok(Self::Outbound),
            _ => Err(CoreError::BadRequest(format!(
                "Request type must be {REQUEST_INBOUND} or {REQUEST_OUTBOUND}, got '{s}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => REQUEST_INBOUND,
            Self::Outbound => REQUEST_OUTBOUND,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A deferred inbound intent.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundIntent {
    /// Create a new non-stackable item and stock it.
    CreateUnique(NewUniqueItem),
    /// Add stock to an existing item.
    UpdateStackable(StockIn),
    /// Payload written before `mode` existed; executes like `UpdateStackable`.
    Legacy(StockIn),
}

impl InboundIntent {
    pub fn mode(&self) -> Option<&'static str> {
        match self {
            Self::CreateUnique(_) => Some(MODE_CREATE_UNIQUE),
            Self::UpdateStackable(_) => Some(MODE_UPDATE_STACKABLE),
            Self::Legacy(_) => None,
        }
    }
}

impl Serialize for InboundIntent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Self::CreateUnique(item) => serde_json::to_value(item),
            Self::UpdateStackable(cmd) | Self::Legacy(cmd) => serde_json::to_value(cmd),
        };
        let mut value = value.map_err(serde::ser::Error::custom)?;

        if let (Some(mode), Some(fields)) = (self.mode(), value.as_object_mut()) {
            fields.insert("mode".to_string(), Value::from(mode));
        }
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InboundIntent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let mode = value
            .get("mode")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let parsed = match mode.as_deref() {
            Some(MODE_CREATE_UNIQUE) => serde_json::from_value(value).map(Self::CreateUnique),
            Some(MODE_UPDATE_STACKABLE) => {
                serde_json::from_value(value).map(Self::UpdateStackable)
            }
            None => serde_json::from_value(value).map(Self::Legacy),
            Some(other) => {
                return Err(serde::de::Error::custom(format!(
                    "unknown inbound mode '{other}'"
                )))
            }
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// The typed form of an approval request's `request_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalPayload {
    Inbound(InboundIntent),
    Outbound(StockOut),
}

impl ApprovalPayload {
    /// Parse stored or submitted request data for the given request type.
    pub fn parse(request_type: RequestType, data: &Value) -> Result<Self, CoreError> {
        let parsed = match request_type {
            RequestType::Inbound => {
                InboundIntent::deserialize(data).map(ApprovalPayload::Inbound)
            }
            RequestType::Outbound => StockOut::deserialize(data).map(ApprovalPayload::Outbound),
        };
        parsed.map_err(|e| {
            CoreError::BadRequest(format!(
                "Invalid {} request data: {e}",
                request_type.as_str()
            ))
        })
    }

    pub fn request_type(&self) -> RequestType {
        match self {
            Self::Inbound(_) => RequestType::Inbound,
            Self::Outbound(_) => RequestType::Outbound,
        }
    }

    /// Canonical JSON document persisted in `approval_requests.request_data`.
    pub fn to_value(&self) -> Result<Value, CoreError> {
        let value = match self {
            Self::Inbound(intent) => serde_json::to_value(intent),
            Self::Outbound(cmd) => serde_json::to_value(cmd),
        };
        value.map_err(|e| CoreError::Internal(format!("Failed to serialize request data: {e}")))
    }

    /// Checks that can run without touching the ledger.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Inbound(InboundIntent::CreateUnique(item)) => item.validate(),
            Self::Inbound(InboundIntent::UpdateStackable(cmd) | InboundIntent::Legacy(cmd)) => {
                validate_quantity(cmd.quantity)?;
                cmd.return_target().map(|_| ())
            }
            Self::Outbound(cmd) => {
                validate_quantity(cmd.quantity)?;
                cmd.borrower().map(|_| ())
            }
        }
    }
}
