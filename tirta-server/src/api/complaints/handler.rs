//! Complaint API Handlers
//!
//! 投诉是整个工作流的入口记录, 三个链接字段指向下游实体:
//! 服务申请单 / 工作指令单 / 维修报告.
//!
//! 更新采用 apply-a-diff 语义: 缺席字段不动, `null` 清空,
//! 带值字段先校验再写入. 链接目标不存在时整个更新原子回滚.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use crate::api::{AppResponse, PageQuery, Paginated, ok};
use crate::auth::{CurrentUser, permissions};
use crate::core::ServerState;
use crate::db::repository::{self, complaint::ComplaintChanges};
use crate::utils::time::parse_rfc3339_millis;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_maps_link,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::Patch;
use shared::models::{Complaint, ComplaintCreate, ComplaintUpdate, RepairReport, ServiceRequest, WorkOrder};

/// 投诉 + 已解析的下游实体, 用于详情/打印页
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetail {
    pub complaint: Complaint,
    pub service_request: Option<ServiceRequest>,
    pub work_order: Option<WorkOrder>,
    pub repair_report: Option<RepairReport>,
}

/// POST /api/complaints - 创建投诉
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ComplaintCreate>,
) -> AppResult<Json<AppResponse<Complaint>>> {
    user.require(permissions::COMPLAINTS_MANAGE)?;

    validate_required_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.complaint_text, "complaintText", MAX_TEXT_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.connection_number, "connectionNumber", MAX_SHORT_TEXT_LEN)?;

    let maps_link = validate_maps_link(payload.maps_link.clone())?;
    let processed_at = match &payload.processed_at {
        Some(s) => Some(parse_rfc3339_millis(s, "processedAt")?),
        None => None,
    };

    let complaint =
        repository::complaint::create(state.pool(), payload, maps_link, processed_at).await?;

    Ok(ok(complaint))
}

/// GET /api/complaints/{id} - 获取单条投诉
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Complaint>>> {
    let complaint = repository::complaint::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Complaint {id}")))?;
    Ok(ok(complaint))
}

/// GET /api/complaints/{id}/detail - 投诉及其下游实体
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<ComplaintDetail>>> {
    let pool = state.pool();
    let complaint = repository::complaint::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Complaint {id}")))?;

    // 链接字段可能悬空 (目标后来被别的流程改动), 详情页按缺席处理
    let service_request = match complaint.service_request_id {
        Some(sr_id) => repository::service_request::find_by_id(pool, sr_id).await?,
        None => None,
    };
    let work_order = match complaint.work_order_id {
        Some(wo_id) => repository::work_order::find_by_id(pool, wo_id).await?,
        None => None,
    };
    let repair_report = match complaint.repair_report_id {
        Some(rr_id) => repository::repair_report::find_by_id(pool, rr_id).await?,
        None => None,
    };

    Ok(ok(ComplaintDetail {
        complaint,
        service_request,
        work_order,
        repair_report,
    }))
}

/// GET /api/complaints - 分页查询
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AppResponse<Paginated<Complaint>>>> {
    let (filter, page, page_size) = query.into_filter(state.config.business_timezone)?;
    let (items, total) = repository::complaint::search(state.pool(), &filter).await?;
    Ok(ok(Paginated::new(items, total, page, page_size)))
}

/// PUT /api/complaints/{id} - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ComplaintUpdate>,
) -> AppResult<Json<AppResponse<Complaint>>> {
    user.require(permissions::COMPLAINTS_MANAGE)?;

    let changes = validate_update(payload)?;
    let complaint = repository::complaint::update(state.pool(), id, changes).await?;
    Ok(ok(complaint))
}

/// 把 wire 层的更新载荷转换为仓库层变更集, 全部校验在此完成
fn validate_update(payload: ComplaintUpdate) -> AppResult<ComplaintChanges> {
    if let Some(v) = &payload.customer_name {
        validate_required_text(v, "customerName", MAX_NAME_LEN)?;
    }
    if let Some(v) = &payload.address {
        validate_required_text(v, "address", MAX_ADDRESS_LEN)?;
    }
    if let Some(v) = &payload.complaint_text {
        validate_required_text(v, "complaintText", MAX_TEXT_LEN)?;
    }
    if let Some(v) = &payload.category {
        validate_required_text(v, "category", MAX_SHORT_TEXT_LEN)?;
    }
    if let Patch::Value(v) = &payload.phone
        && v.len() > MAX_SHORT_TEXT_LEN
    {
        return Err(AppError::validation("phone is too long"));
    }
    if let Patch::Value(v) = &payload.connection_number
        && v.len() > MAX_SHORT_TEXT_LEN
    {
        return Err(AppError::validation("connectionNumber is too long"));
    }

    // 空字符串的 mapsLink 视为清空, 与创建接口的 coercion 一致
    let maps_link = match payload.maps_link {
        Patch::Value(s) => match validate_maps_link(Some(s))? {
            Some(url) => Patch::Value(url),
            None => Patch::Null,
        },
        other => other,
    };

    let processed_at = payload
        .processed_at
        .try_map(|s| parse_rfc3339_millis(&s, "processedAt"))?;

    Ok(ComplaintChanges {
        customer_name: payload.customer_name,
        address: payload.address,
        complaint_text: payload.complaint_text,
        category: payload.category,
        phone: payload.phone,
        maps_link,
        connection_number: payload.connection_number,
        processed_at,
        service_request_id: payload.service_request_id,
        work_order_id: payload.work_order_id,
        repair_report_id: payload.repair_report_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_rejects_empty_required_scalar() {
        let payload = ComplaintUpdate {
            customer_name: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_update(payload).is_err());
    }

    #[test]
    fn update_coerces_empty_maps_link_to_null() {
        let payload = ComplaintUpdate {
            maps_link: Patch::Value(String::new()),
            ..Default::default()
        };
        let changes = validate_update(payload).unwrap();
        assert!(changes.maps_link.is_null());
    }

    #[test]
    fn update_rejects_malformed_maps_link() {
        let payload = ComplaintUpdate {
            maps_link: Patch::Value("not a url".into()),
            ..Default::default()
        };
        assert!(validate_update(payload).is_err());
    }

    #[test]
    fn update_parses_processed_at() {
        let payload = ComplaintUpdate {
            processed_at: Patch::Value("2025-04-17T08:30:00+07:00".into()),
            ..Default::default()
        };
        let changes = validate_update(payload).unwrap();
        assert!(matches!(changes.processed_at, Patch::Value(_)));

        let payload = ComplaintUpdate {
            processed_at: Patch::Value("yesterday".into()),
            ..Default::default()
        };
        assert!(validate_update(payload).is_err());
    }
}
