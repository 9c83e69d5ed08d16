//! Complaint Model (客户投诉)

use serde::{Deserialize, Serialize};

use crate::Patch;

/// Complaint entity — the intake record of a customer-reported issue.
///
/// The three linkage fields point at downstream workflow entities and
/// live directly on the complaint row (forward links, no join table).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Complaint {
    pub id: i64,
    pub customer_name: String,
    pub address: String,
    pub complaint_text: String,
    /// Handling category, e.g. "Distribusi" or "Hubungan Langganan"
    pub category: String,
    pub phone: Option<String>,
    pub maps_link: Option<String>,
    pub connection_number: Option<String>,
    /// Set once the complaint is considered handled (Unix millis)
    pub processed_at: Option<i64>,
    pub service_request_id: Option<i64>,
    pub work_order_id: Option<i64>,
    pub repair_report_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create complaint payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCreate {
    pub customer_name: String,
    pub address: String,
    pub complaint_text: String,
    pub category: String,
    pub phone: Option<String>,
    pub maps_link: Option<String>,
    pub connection_number: Option<String>,
    /// RFC 3339 timestamp; converted to millis at the handler layer
    pub processed_at: Option<String>,
}

/// Update complaint payload (apply-a-diff semantics)
///
/// Scalar fields are two-state `Option` (absent = unchanged).
/// Clearable fields are three-state [`Patch`] so "key absent" and
/// "key: null" stay distinguishable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdate {
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub complaint_text: Option<String>,
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub phone: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub maps_link: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub connection_number: Patch<String>,
    /// RFC 3339 timestamp; `null` clears the processed mark
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub processed_at: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub service_request_id: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub work_order_id: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub repair_report_id: Patch<i64>,
}
