//! Work Order API Handlers (SPK)

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::{AppResponse, PageQuery, Paginated, ok};
use crate::auth::{CurrentUser, permissions};
use crate::core::ServerState;
use crate::db::repository::{
    self,
    work_order::{WorkOrderChanges, WorkOrderDates},
};
use crate::utils::time::parse_rfc3339_millis;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{WorkOrder, WorkOrderCreate, WorkOrderUpdate};

/// POST /api/work-orders - 创建工作指令单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WorkOrderCreate>,
) -> AppResult<Json<AppResponse<WorkOrder>>> {
    user.require(permissions::WORK_ORDERS_MANAGE)?;

    validate_required_text(&payload.number, "number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.reporter_name, "reporterName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.disturbance_location, "disturbanceLocation", MAX_TEXT_LEN)?;
    validate_optional_text(&payload.disturbance_type, "disturbanceType", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.executor_name, "executorName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.team, "team", MAX_SHORT_TEXT_LEN)?;

    let dates = WorkOrderDates {
        report_date: parse_opt(&payload.report_date, "reportDate")?,
        handled_date: parse_opt(&payload.handled_date, "handledDate")?,
        city_date: parse_opt(&payload.city_date, "cityDate")?,
    };

    let order = repository::work_order::create(state.pool(), payload, dates).await?;
    Ok(ok(order))
}

/// GET /api/work-orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<WorkOrder>>> {
    let order = repository::work_order::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Work order {id}")))?;
    Ok(ok(order))
}

/// GET /api/work-orders - 分页查询
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AppResponse<Paginated<WorkOrder>>>> {
    let (filter, page, page_size) = query.into_filter(state.config.business_timezone)?;
    let (items, total) = repository::work_order::search(state.pool(), &filter).await?;
    Ok(ok(Paginated::new(items, total, page, page_size)))
}

/// PUT /api/work-orders/{id} - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<WorkOrderUpdate>,
) -> AppResult<Json<AppResponse<WorkOrder>>> {
    user.require(permissions::WORK_ORDERS_MANAGE)?;

    if let Some(v) = &payload.number {
        validate_required_text(v, "number", MAX_SHORT_TEXT_LEN)?;
    }

    let changes = WorkOrderChanges {
        number: payload.number,
        report_date: payload
            .report_date
            .try_map(|s| parse_rfc3339_millis(&s, "reportDate"))?,
        handled_date: payload
            .handled_date
            .try_map(|s| parse_rfc3339_millis(&s, "handledDate"))?,
        reporter_name: payload.reporter_name,
        handling_time: payload.handling_time,
        disturbance_location: payload.disturbance_location,
        disturbance_type: payload.disturbance_type,
        city: payload.city,
        city_date: payload
            .city_date
            .try_map(|s| parse_rfc3339_millis(&s, "cityDate"))?,
        executor_name: payload.executor_name,
        team: payload.team,
        service_request_id: payload.service_request_id,
    };

    let order = repository::work_order::update(state.pool(), id, changes).await?;
    Ok(ok(order))
}

fn parse_opt(value: &Option<String>, field: &str) -> AppResult<Option<i64>> {
    match value {
        Some(s) => Ok(Some(parse_rfc3339_millis(s, field)?)),
        None => Ok(None),
    }
}
