//! Work Order Model (工作指令单 / SPK)

use serde::{Deserialize, Serialize};

use crate::Patch;

/// Work order entity — the dispatch document assigning a team to a
/// service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WorkOrder {
    pub id: i64,
    /// Official document number, e.g. "690/SPK/IV/2025"
    pub number: String,
    pub report_date: Option<i64>,
    pub handled_date: Option<i64>,
    pub reporter_name: Option<String>,
    pub handling_time: Option<String>,
    pub disturbance_location: Option<String>,
    pub disturbance_type: Option<String>,
    pub city: Option<String>,
    pub city_date: Option<i64>,
    pub executor_name: Option<String>,
    pub team: Option<String>,
    pub service_request_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create work order payload (dates as RFC 3339 strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderCreate {
    pub number: String,
    pub report_date: Option<String>,
    pub handled_date: Option<String>,
    pub reporter_name: Option<String>,
    pub handling_time: Option<String>,
    pub disturbance_location: Option<String>,
    pub disturbance_type: Option<String>,
    pub city: Option<String>,
    pub city_date: Option<String>,
    pub executor_name: Option<String>,
    pub team: Option<String>,
    pub service_request_id: Option<i64>,
}

/// Update work order payload (apply-a-diff semantics)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderUpdate {
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub report_date: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub handled_date: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub reporter_name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub handling_time: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub disturbance_location: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub disturbance_type: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub city: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub city_date: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub executor_name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub team: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub service_request_id: Patch<i64>,
}
