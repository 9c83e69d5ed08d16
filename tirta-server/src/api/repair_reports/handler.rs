//! Repair Report API Handlers
//!
//! 报告正文是不透明 JSON 对象 (打印表单产出什么就存什么),
//! 服务端只校验它确实是个对象.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::{AppResponse, PageQuery, Paginated, ok};
use crate::auth::{CurrentUser, permissions};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::{AppError, AppResult};
use shared::models::{RepairReport, RepairReportCreate, RepairReportUpdate};

fn ensure_object(value: &serde_json::Value) -> AppResult<()> {
    if !value.is_object() {
        return Err(AppError::validation("content must be a JSON object"));
    }
    Ok(())
}

/// POST /api/repair-reports - 创建维修报告
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RepairReportCreate>,
) -> AppResult<Json<AppResponse<RepairReport>>> {
    user.require(permissions::REPAIR_REPORTS_MANAGE)?;
    ensure_object(&payload.content)?;

    let report = repository::repair_report::create(state.pool(), &payload.content).await?;
    Ok(ok(report))
}

/// GET /api/repair-reports/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<RepairReport>>> {
    let report = repository::repair_report::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Repair report {id}")))?;
    Ok(ok(report))
}

/// GET /api/repair-reports - 分页查询
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AppResponse<Paginated<RepairReport>>>> {
    let (filter, page, page_size) = query.into_filter(state.config.business_timezone)?;
    let (items, total) = repository::repair_report::search(state.pool(), &filter).await?;
    Ok(ok(Paginated::new(items, total, page, page_size)))
}

/// PUT /api/repair-reports/{id} - 整体替换报告内容
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RepairReportUpdate>,
) -> AppResult<Json<AppResponse<RepairReport>>> {
    user.require(permissions::REPAIR_REPORTS_MANAGE)?;
    if let Some(content) = &payload.content {
        ensure_object(content)?;
    }

    let report =
        repository::repair_report::update(state.pool(), id, payload.content.as_ref()).await?;
    Ok(ok(report))
}
