//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` for standalone statements, or `&mut DbTx` when the
//! statement must run inside a caller's transaction (row locks, ledger
//! writes).

pub(crate) mod filter;

pub mod approval_repo;
pub mod category_repo;
pub mod inbound_repo;
pub mod item_repo;
pub mod operation_log_repo;
pub mod outbound_repo;
pub mod stats_repo;

pub use approval_repo::ApprovalRepo;
pub use category_repo::CategoryRepo;
pub use inbound_repo::InboundRepo;
pub use item_repo::ItemRepo;
pub use operation_log_repo::OperationLogRepo;
pub use outbound_repo::OutboundRepo;
pub use stats_repo::StatsRepo;
