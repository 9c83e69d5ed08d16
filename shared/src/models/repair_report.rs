//! Repair Report Model (维修报告)
//!
//! The report body is free-form and treated opaquely: the server
//! stores whatever JSON object the print form produces.

use serde::{Deserialize, Serialize};

/// Repair report entity — completion record for a work order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub id: i64,
    /// Opaque report fields (JSON object)
    pub content: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create repair report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReportCreate {
    pub content: serde_json::Value,
}

/// Update repair report payload — replaces the whole content object
/// (the report is opaque, there is nothing to merge field-by-field)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReportUpdate {
    pub content: Option<serde_json::Value>,
}
