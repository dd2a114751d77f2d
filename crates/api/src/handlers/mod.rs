pub mod approval;
pub mod category;
pub mod inbound;
pub mod item;
pub mod operation_log;
pub mod outbound;
pub mod stats;
