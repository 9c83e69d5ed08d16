//! Service Request API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::{AppResponse, PageQuery, Paginated, ok};
use crate::auth::{CurrentUser, permissions};
use crate::core::ServerState;
use crate::db::repository::{
    self,
    service_request::{ServiceRequestChanges, ServiceRequestTimes},
};
use crate::utils::time::parse_rfc3339_millis;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_one_of,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::Patch;
use shared::models::{
    SERVICE_COST_BY, ServiceRequest, ServiceRequestCreate, ServiceRequestUpdate,
};

/// POST /api/service-requests - 创建服务申请单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ServiceRequestCreate>,
) -> AppResult<Json<AppResponse<ServiceRequest>>> {
    user.require(permissions::SERVICE_REQUESTS_MANAGE)?;

    validate_required_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.service_number, "serviceNumber", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.other_reason, "otherReason", MAX_TEXT_LEN)?;
    validate_optional_text(&payload.action_taken, "actionTaken", MAX_TEXT_LEN)?;
    if let Some(v) = &payload.service_cost_by {
        validate_one_of(v, "serviceCostBy", SERVICE_COST_BY)?;
    }

    let times = ServiceRequestTimes {
        received_at: parse_opt(&payload.received_at, "receivedAt")?,
        handled_at: parse_opt(&payload.handled_at, "handledAt")?,
        inspected_at: parse_opt(&payload.inspected_at, "inspectedAt")?,
        handed_over_at: parse_opt(&payload.handed_over_at, "handedOverAt")?,
    };

    let request = repository::service_request::create(state.pool(), payload, times).await?;
    Ok(ok(request))
}

/// GET /api/service-requests/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<ServiceRequest>>> {
    let request = repository::service_request::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service request {id}")))?;
    Ok(ok(request))
}

/// GET /api/service-requests - 分页查询
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AppResponse<Paginated<ServiceRequest>>>> {
    let (filter, page, page_size) = query.into_filter(state.config.business_timezone)?;
    let (items, total) = repository::service_request::search(state.pool(), &filter).await?;
    Ok(ok(Paginated::new(items, total, page, page_size)))
}

/// PUT /api/service-requests/{id} - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceRequestUpdate>,
) -> AppResult<Json<AppResponse<ServiceRequest>>> {
    user.require(permissions::SERVICE_REQUESTS_MANAGE)?;

    let changes = validate_update(payload)?;
    let request = repository::service_request::update(state.pool(), id, changes).await?;
    Ok(ok(request))
}

fn parse_opt(value: &Option<String>, field: &str) -> AppResult<Option<i64>> {
    match value {
        Some(s) => Ok(Some(parse_rfc3339_millis(s, field)?)),
        None => Ok(None),
    }
}

fn validate_update(payload: ServiceRequestUpdate) -> AppResult<ServiceRequestChanges> {
    if let Some(v) = &payload.customer_name {
        validate_required_text(v, "customerName", MAX_NAME_LEN)?;
    }
    if let Some(v) = &payload.address {
        validate_required_text(v, "address", MAX_ADDRESS_LEN)?;
    }
    if let Patch::Value(v) = &payload.service_cost_by {
        validate_one_of(v, "serviceCostBy", SERVICE_COST_BY)?;
    }

    Ok(ServiceRequestChanges {
        customer_name: payload.customer_name,
        address: payload.address,
        service_number: payload.service_number,
        phone: payload.phone,
        received_at: payload
            .received_at
            .try_map(|s| parse_rfc3339_millis(&s, "receivedAt"))?,
        received_by: payload.received_by,
        handled_at: payload
            .handled_at
            .try_map(|s| parse_rfc3339_millis(&s, "handledAt"))?,
        handled_by: payload.handled_by,
        inspected_at: payload
            .inspected_at
            .try_map(|s| parse_rfc3339_millis(&s, "inspectedAt"))?,
        inspected_by: payload.inspected_by,
        reasons: payload.reasons,
        other_reason: payload.other_reason,
        action_taken: payload.action_taken,
        service_cost_by: payload.service_cost_by,
        handed_over_by: payload.handed_over_by,
        handed_over_at: payload
            .handed_over_at
            .try_map(|s| parse_rfc3339_millis(&s, "handedOverAt"))?,
        work_order_id: payload.work_order_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_rejects_unknown_cost_bearer() {
        let payload = ServiceRequestUpdate {
            service_cost_by: Patch::Value("Gratis".into()),
            ..Default::default()
        };
        assert!(validate_update(payload).is_err());
    }

    #[test]
    fn update_accepts_null_cost_bearer() {
        let payload = ServiceRequestUpdate {
            service_cost_by: Patch::Null,
            ..Default::default()
        };
        let changes = validate_update(payload).unwrap();
        assert!(changes.service_cost_by.is_null());
    }
}
