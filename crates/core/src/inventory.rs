//! Item ledger rules: status/type enums, status derivation, and the stock
//! movement commands shared by the direct and the approval paths.
//!
//! Item status records which kind of event last touched the item, not a
//! fill ratio: an inbound always lands on `in_stock` (or `out_of_stock` at
//! zero) and an outbound always lands on `partially_out` (or `out_of_stock`
//! at zero), even when the resulting quantities are identical.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_IN_STOCK: &str = "in_stock";
pub const STATUS_OUT_OF_STOCK: &str = "out_of_stock";
pub const STATUS_PARTIALLY_OUT: &str = "partially_out";

/// All valid item status strings.
pub const VALID_ITEM_STATUSES: &[&str] =
    &[STATUS_IN_STOCK, STATUS_OUT_OF_STOCK, STATUS_PARTIALLY_OUT];

pub const INBOUND_INITIAL: &str = "initial";
pub const INBOUND_RETURN: &str = "return";

pub const OUTBOUND_TRANSFER: &str = "transfer";
pub const OUTBOUND_BORROW: &str = "borrow";

/// Initial stock assumed by a `create_unique` request that omits it.
pub const DEFAULT_UNIQUE_INITIAL_STOCK: i32 = 1;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Derived stock status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InStock,
    OutOfStock,
    PartiallyOut,
}

impl ItemStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_IN_STOCK => Ok(Self::InStock),
            STATUS_OUT_OF_STOCK => Ok(Self::OutOfStock),
            STATUS_PARTIALLY_OUT => Ok(Self::PartiallyOut),
            _ => Err(CoreError::BadRequest(format!(
                "Invalid item status '{s}'. Must be one of: {}",
                VALID_ITEM_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => STATUS_IN_STOCK,
            Self::OutOfStock => STATUS_OUT_OF_STOCK,
            Self::PartiallyOut => STATUS_PARTIALLY_OUT,
        }
    }
}

/// Kind of stock increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundType {
    Initial,
    Return,
}

impl InboundType {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            INBOUND_INITIAL => Ok(Self::Initial),
            INBOUND_RETURN => Ok(Self::Return),
            _ => Err(CoreError::BadRequest(format!(
                "Inbound type must be {INBOUND_INITIAL} or {INBOUND_RETURN}, got '{s}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => INBOUND_INITIAL,
            Self::Return => INBOUND_RETURN,
        }
    }
}

/// Kind of stock decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundType {
    Transfer,
    Borrow,
}

impl OutboundType {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            OUTBOUND_TRANSFER => Ok(Self::Transfer),
            OUTBOUND_BORROW => Ok(Self::Borrow),
            _ => Err(CoreError::BadRequest(format!(
                "Outbound type must be {OUTBOUND_TRANSFER} or {OUTBOUND_BORROW}, got '{s}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => OUTBOUND_TRANSFER,
            Self::Borrow => OUTBOUND_BORROW,
        }
    }
}

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

/// Status of a freshly created item holding `quantity` units.
pub fn initial_status(quantity: i32) -> ItemStatus {
    status_after_inbound(quantity)
}

/// Status after an inbound movement left the item at `new_quantity`.
pub fn status_after_inbound(new_quantity: i32) -> ItemStatus {
    if new_quantity > 0 {
        ItemStatus::InStock
    } else {
        ItemStatus::OutOfStock
    }
}

/// Status after an outbound movement left the item at `new_quantity`.
pub fn status_after_outbound(new_quantity: i32) -> ItemStatus {
    if new_quantity == 0 {
        ItemStatus::OutOfStock
    } else {
        ItemStatus::PartiallyOut
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject non-positive movement quantities.
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity <= 0 {
        return Err(CoreError::BadRequest(format!(
            "Quantity must be greater than 0, got {quantity}"
        )));
    }
    Ok(())
}

/// Reject an outbound that would drive the item below zero.
pub fn ensure_sufficient_stock(current: i32, requested: i32) -> Result<(), CoreError> {
    if requested > current {
        return Err(CoreError::BadRequest(format!(
            "Insufficient stock, current stock: {current}, requested: {requested}"
        )));
    }
    Ok(())
}

/// Check the unique code against the stackable flag and normalise it.
///
/// Non-stackable items must carry a non-blank code; stackable items are
/// tracked by quantity alone and must not carry one.
pub fn validate_unique_code(
    is_stackable: bool,
    unique_code: Option<&str>,
) -> Result<Option<String>, CoreError> {
    let code = unique_code.map(str::trim).filter(|c| !c.is_empty());
    match (is_stackable, code) {
        (false, None) => Err(CoreError::BadRequest(
            "Non-stackable items must have a unique code".to_string(),
        )),
        (false, Some(code)) => Ok(Some(code.to_string())),
        (true, None) => Ok(None),
        (true, Some(_)) => Err(CoreError::BadRequest(
            "Stackable items are tracked by quantity and must not have a unique code".to_string(),
        )),
    }
}

/// Reject blank required text fields.
pub fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stock movement commands
// ---------------------------------------------------------------------------

/// A stock increase against an existing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockIn {
    pub item_id: DbId,
    pub quantity: i32,
    pub inbound_type: InboundType,
    pub related_outbound_id: Option<DbId>,
    pub remarks: Option<String>,
}

impl StockIn {
    /// The outbound record a return settles.
    ///
    /// Returns `None` for initial stocking; a return without one is rejected.
    pub fn return_target(&self) -> Result<Option<DbId>, CoreError> {
        match (self.inbound_type, self.related_outbound_id) {
            (InboundType::Return, None) => Err(CoreError::BadRequest(
                "Related outbound ID is required for return type".to_string(),
            )),
            (InboundType::Return, Some(id)) => Ok(Some(id)),
            (InboundType::Initial, _) => Ok(None),
        }
    }
}

/// Contact details of the person holding a borrowed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// A stock decrease against an existing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOut {
    pub item_id: DbId,
    pub quantity: i32,
    pub outbound_type: OutboundType,
    pub borrower_name: Option<String>,
    pub borrower_phone: Option<String>,
    pub borrower_email: Option<String>,
    /// `None` means an open-ended loan.
    pub expected_return_date: Option<Date>,
    pub remarks: Option<String>,
}

impl StockOut {
    /// Borrower details, required (all three, non-blank) for borrows.
    ///
    /// Transfers pass through whatever contact details were supplied.
    pub fn borrower(&self) -> Result<Option<Borrower>, CoreError> {
        let name = non_blank(self.borrower_name.as_deref());
        let phone = non_blank(self.borrower_phone.as_deref());
        let email = non_blank(self.borrower_email.as_deref());

        match (name, phone, email) {
            (Some(name), Some(phone), Some(email)) => Ok(Some(Borrower {
                name: name.to_string(),
                phone: phone.to_string(),
                email: email.to_string(),
            })),
            _ if self.outbound_type == OutboundType::Borrow => Err(CoreError::BadRequest(
                "Borrowing requires borrower name, phone and email".to_string(),
            )),
            _ => Ok(None),
        }
    }
}

/// A brand-new individually identified item stocked in one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUniqueItem {
    pub unique_code: String,
    pub name: String,
    pub category_id: DbId,
    pub model: Option<String>,
    pub specification: Option<String>,
    pub description: Option<String>,
    /// Defaults to [`DEFAULT_UNIQUE_INITIAL_STOCK`].
    pub initial_stock: Option<i32>,
    pub remarks: Option<String>,
}

impl NewUniqueItem {
    pub fn stock(&self) -> i32 {
        self.initial_stock.unwrap_or(DEFAULT_UNIQUE_INITIAL_STOCK)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("Item name", &self.name)?;
        validate_unique_code(false, Some(&self.unique_code))?;
        validate_quantity(self.stock())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn borrow(name: Option<&str>, phone: Option<&str>, email: Option<&str>) -> StockOut {
        StockOut {
            item_id: 1,
            quantity: 1,
            outbound_type: OutboundType::Borrow,
            borrower_name: name.map(String::from),
            borrower_phone: phone.map(String::from),
            borrower_email: email.map(String::from),
            expected_return_date: None,
            remarks: None,
        }
    }

    #[test]
    fn test_status_after_inbound() {
        assert_eq!(status_after_inbound(10), ItemStatus::InStock);
        assert_eq!(status_after_inbound(0), ItemStatus::OutOfStock);
    }

    #[test]
    fn test_status_after_outbound_is_partially_out_for_any_remainder() {
        assert_eq!(status_after_outbound(0), ItemStatus::OutOfStock);
        assert_eq!(status_after_outbound(1), ItemStatus::PartiallyOut);
        assert_eq!(status_after_outbound(1000), ItemStatus::PartiallyOut);
    }

    #[test]
    fn test_same_quantity_different_status_by_event() {
        assert_ne!(status_after_inbound(6), status_after_outbound(6));
    }

    #[test]
    fn test_status_round_trips_through_db_strings() {
        for s in VALID_ITEM_STATUSES {
            assert_eq!(ItemStatus::from_str_value(s).unwrap().as_str(), *s);
        }
        assert_matches!(
            ItemStatus::from_str_value("full"),
            Err(CoreError::BadRequest(_))
        );
    }

    #[test]
    fn test_movement_types_reject_unknown_values() {
        assert_matches!(
            InboundType::from_str_value("gift"),
            Err(CoreError::BadRequest(_))
        );
        assert_matches!(
            OutboundType::from_str_value("sale"),
            Err(CoreError::BadRequest(_))
        );
        assert_eq!(
            OutboundType::from_str_value("borrow").unwrap(),
            OutboundType::Borrow
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert_matches!(validate_quantity(0), Err(CoreError::BadRequest(_)));
        assert_matches!(validate_quantity(-3), Err(CoreError::BadRequest(_)));
    }

    #[test]
    fn test_insufficient_stock_message_states_both_numbers() {
        assert!(ensure_sufficient_stock(5, 5).is_ok());
        let err = ensure_sufficient_stock(5, 6).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("current stock: 5"));
        assert!(msg.contains("requested: 6"));
    }

    #[test]
    fn test_non_stackable_requires_code() {
        assert_matches!(
            validate_unique_code(false, None),
            Err(CoreError::BadRequest(_))
        );
        assert_matches!(
            validate_unique_code(false, Some("   ")),
            Err(CoreError::BadRequest(_))
        );
        assert_eq!(
            validate_unique_code(false, Some(" LHT3000 ")).unwrap(),
            Some("LHT3000".to_string())
        );
    }

    #[test]
    fn test_stackable_forbids_code() {
        assert_eq!(validate_unique_code(true, None).unwrap(), None);
        assert_eq!(validate_unique_code(true, Some("")).unwrap(), None);
        assert_matches!(
            validate_unique_code(true, Some("X-1")),
            Err(CoreError::BadRequest(_))
        );
    }

    #[test]
    fn test_return_requires_related_outbound() {
        let mut cmd = StockIn {
            item_id: 1,
            quantity: 2,
            inbound_type: InboundType::Return,
            related_outbound_id: None,
            remarks: None,
        };
        assert_matches!(cmd.return_target(), Err(CoreError::BadRequest(_)));

        cmd.related_outbound_id = Some(9);
        assert_eq!(cmd.return_target().unwrap(), Some(9));

        cmd.inbound_type = InboundType::Initial;
        assert_eq!(cmd.return_target().unwrap(), None);
    }

    #[test]
    fn test_borrow_requires_all_contact_fields() {
        assert!(borrow(Some("Ana"), Some("555"), Some("ana@example.com"))
            .borrower()
            .unwrap()
            .is_some());
        assert_matches!(
            borrow(Some("Ana"), None, Some("ana@example.com")).borrower(),
            Err(CoreError::BadRequest(_))
        );
        assert_matches!(
            borrow(Some("  "), Some("555"), Some("ana@example.com")).borrower(),
            Err(CoreError::BadRequest(_))
        );
    }

    #[test]
    fn test_transfer_needs_no_borrower() {
        let mut cmd = borrow(None, None, None);
        cmd.outbound_type = OutboundType::Transfer;
        assert_eq!(cmd.borrower().unwrap(), None);
    }

    #[test]
    fn test_unique_item_defaults_to_one_unit() {
        let item = NewUniqueItem {
            unique_code: "SN-1".into(),
            name: "Gripper".into(),
            category_id: 1,
            model: None,
            specification: None,
            description: None,
            initial_stock: None,
            remarks: None,
        };
        assert_eq!(item.stock(), DEFAULT_UNIQUE_INITIAL_STOCK);
        assert!(item.validate().is_ok());

        let empty = NewUniqueItem {
            initial_stock: Some(0),
            ..item
        };
        assert_matches!(empty.validate(), Err(CoreError::BadRequest(_)));
    }
}
