//! Data models
//!
//! Shared between tirta-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps are
//! Unix millis. JSON field names are camelCase to match the web client.

pub mod complaint;
pub mod employee;
pub mod repair_report;
pub mod service_request;
pub mod work_order;

// Re-exports
pub use complaint::*;
pub use employee::*;
pub use repair_report::*;
pub use service_request::*;
pub use work_order::*;
