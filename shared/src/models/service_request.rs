//! Service Request Model (服务申请单)

use serde::{Deserialize, Serialize};

use crate::Patch;

/// Who bears the service cost.
pub const SERVICE_COST_BY: &[&str] = &["PERUMDA AM", "Langganan"];

/// Service request entity — the staff-managed escalation of a
/// complaint that requires a site visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: i64,
    pub customer_name: String,
    pub address: String,
    pub service_number: Option<String>,
    pub phone: Option<String>,
    pub received_at: Option<i64>,
    pub received_by: Option<String>,
    pub handled_at: Option<i64>,
    pub handled_by: Option<String>,
    pub inspected_at: Option<i64>,
    pub inspected_by: Option<String>,
    /// Standardized escalation reasons (checkbox list on the paper form)
    pub reasons: Vec<String>,
    pub other_reason: Option<String>,
    pub action_taken: Option<String>,
    /// "PERUMDA AM" | "Langganan"
    pub service_cost_by: Option<String>,
    pub handed_over_by: Option<String>,
    pub handed_over_at: Option<i64>,
    pub work_order_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create service request payload (timestamps as RFC 3339 strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestCreate {
    pub customer_name: String,
    pub address: String,
    pub service_number: Option<String>,
    pub phone: Option<String>,
    pub received_at: Option<String>,
    pub received_by: Option<String>,
    pub handled_at: Option<String>,
    pub handled_by: Option<String>,
    pub inspected_at: Option<String>,
    pub inspected_by: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub other_reason: Option<String>,
    pub action_taken: Option<String>,
    pub service_cost_by: Option<String>,
    pub handed_over_by: Option<String>,
    pub handed_over_at: Option<String>,
}

/// Update service request payload (apply-a-diff semantics)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestUpdate {
    pub customer_name: Option<String>,
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub service_number: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub phone: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub received_at: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub received_by: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub handled_at: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub handled_by: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub inspected_at: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub inspected_by: Patch<String>,
    pub reasons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub other_reason: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub action_taken: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub service_cost_by: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub handed_over_by: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub handed_over_at: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub work_order_id: Patch<i64>,
}
