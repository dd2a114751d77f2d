//! Operation log vocabulary.
//!
//! Every mutating engine operation writes one entry after its transaction
//! commits. The `operation_type` and `target_type` columns are free text in
//! the database; these constants are the values the engine writes.

pub const OP_INBOUND: &str = "inbound";
pub const OP_OUTBOUND: &str = "outbound";
pub const OP_EDIT_ITEM: &str = "edit_item";
pub const OP_EDIT_CATEGORY: &str = "edit_category";
pub const OP_APPROVAL: &str = "approval";

/// All operation types the engine records.
pub const VALID_OPERATION_TYPES: &[&str] = &[
    OP_INBOUND,
    OP_OUTBOUND,
    OP_EDIT_ITEM,
    OP_EDIT_CATEGORY,
    OP_APPROVAL,
];

pub const TARGET_ITEM: &str = "item";
pub const TARGET_CATEGORY: &str = "category";
pub const TARGET_OUTBOUND_RECORD: &str = "outbound_record";
pub const TARGET_APPROVAL_REQUEST: &str = "approval_request";

/// All target types the engine records.
pub const VALID_TARGET_TYPES: &[&str] = &[
    TARGET_ITEM,
    TARGET_CATEGORY,
    TARGET_OUTBOUND_RECORD,
    TARGET_APPROVAL_REQUEST,
];

/// Whether `value` is a known operation type (used to validate list filters).
pub fn is_valid_operation_type(value: &str) -> bool {
    VALID_OPERATION_TYPES.contains(&value)
}

/// Whether `value` is a known target type.
pub fn is_valid_target_type(value: &str) -> bool {
    VALID_TARGET_TYPES.contains(&value)
}
