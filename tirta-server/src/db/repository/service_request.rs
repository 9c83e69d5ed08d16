//! Service Request Repository
//!
//! `reasons` 在数据库里是 JSON 文本列，行结构体在这里转换成
//! `Vec<String>` 后再交给上层。

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{PageFilter, RepoError, RepoResult, ensure_exists, push_patch_i64, push_patch_text};
use shared::models::{ServiceRequest, ServiceRequestCreate};
use shared::{Patch, util};

const SELECT: &str = "SELECT id, customer_name, address, service_number, phone, received_at, \
     received_by, handled_at, handled_by, inspected_at, inspected_by, reasons, other_reason, \
     action_taken, service_cost_by, handed_over_by, handed_over_at, work_order_id, \
     created_at, updated_at FROM service_request";

/// DB row with `reasons` still serialized as JSON text
#[derive(Debug, sqlx::FromRow)]
struct ServiceRequestRow {
    id: i64,
    customer_name: String,
    address: String,
    service_number: Option<String>,
    phone: Option<String>,
    received_at: Option<i64>,
    received_by: Option<String>,
    handled_at: Option<i64>,
    handled_by: Option<String>,
    inspected_at: Option<i64>,
    inspected_by: Option<String>,
    reasons: String,
    other_reason: Option<String>,
    action_taken: Option<String>,
    service_cost_by: Option<String>,
    handed_over_by: Option<String>,
    handed_over_at: Option<i64>,
    work_order_id: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl From<ServiceRequestRow> for ServiceRequest {
    fn from(r: ServiceRequestRow) -> Self {
        ServiceRequest {
            id: r.id,
            customer_name: r.customer_name,
            address: r.address,
            service_number: r.service_number,
            phone: r.phone,
            received_at: r.received_at,
            received_by: r.received_by,
            handled_at: r.handled_at,
            handled_by: r.handled_by,
            inspected_at: r.inspected_at,
            inspected_by: r.inspected_by,
            reasons: serde_json::from_str(&r.reasons).unwrap_or_default(),
            other_reason: r.other_reason,
            action_taken: r.action_taken,
            service_cost_by: r.service_cost_by,
            handed_over_by: r.handed_over_by,
            handed_over_at: r.handed_over_at,
            work_order_id: r.work_order_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Typed change set; timestamps already converted to Unix millis.
#[derive(Debug, Default)]
pub struct ServiceRequestChanges {
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub service_number: Patch<String>,
    pub phone: Patch<String>,
    pub received_at: Patch<i64>,
    pub received_by: Patch<String>,
    pub handled_at: Patch<i64>,
    pub handled_by: Patch<String>,
    pub inspected_at: Patch<i64>,
    pub inspected_by: Patch<String>,
    pub reasons: Option<Vec<String>>,
    pub other_reason: Patch<String>,
    pub action_taken: Patch<String>,
    pub service_cost_by: Patch<String>,
    pub handed_over_by: Patch<String>,
    pub handed_over_at: Patch<i64>,
    pub work_order_id: Patch<i64>,
}

impl ServiceRequestChanges {
    fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.address.is_none()
            && self.reasons.is_none()
            && self.service_number.is_missing()
            && self.phone.is_missing()
            && self.received_at.is_missing()
            && self.received_by.is_missing()
            && self.handled_at.is_missing()
            && self.handled_by.is_missing()
            && self.inspected_at.is_missing()
            && self.inspected_by.is_missing()
            && self.other_reason.is_missing()
            && self.action_taken.is_missing()
            && self.service_cost_by.is_missing()
            && self.handed_over_by.is_missing()
            && self.handed_over_at.is_missing()
            && self.work_order_id.is_missing()
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ServiceRequest>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ServiceRequestRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

/// Create a service request. Timestamp fields arrive pre-converted
/// from the handler as a parallel struct of millis.
pub struct ServiceRequestTimes {
    pub received_at: Option<i64>,
    pub handled_at: Option<i64>,
    pub inspected_at: Option<i64>,
    pub handed_over_at: Option<i64>,
}

pub async fn create(
    pool: &SqlitePool,
    data: ServiceRequestCreate,
    times: ServiceRequestTimes,
) -> RepoResult<ServiceRequest> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    let reasons_json = serde_json::to_string(&data.reasons)
        .map_err(|e| RepoError::Database(format!("Failed to encode reasons: {e}")))?;

    sqlx::query(
        "INSERT INTO service_request (id, customer_name, address, service_number, phone, \
         received_at, received_by, handled_at, handled_by, inspected_at, inspected_by, reasons, \
         other_reason, action_taken, service_cost_by, handed_over_by, handed_over_at, \
         created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.customer_name)
    .bind(&data.address)
    .bind(&data.service_number)
    .bind(&data.phone)
    .bind(times.received_at)
    .bind(&data.received_by)
    .bind(times.handled_at)
    .bind(&data.handled_by)
    .bind(times.inspected_at)
    .bind(&data.inspected_by)
    .bind(&reasons_json)
    .bind(&data.other_reason)
    .bind(&data.action_taken)
    .bind(&data.service_cost_by)
    .bind(&data.handed_over_by)
    .bind(times.handed_over_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create service request".into()))
}

/// Partial update with the same transaction/diff semantics as the
/// complaint repository.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: ServiceRequestChanges,
) -> RepoResult<ServiceRequest> {
    // 空 diff 什么都不写, 连 updated_at 也不动
    if changes.is_empty() {
        return find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service request {id} not found")));
    }

    let mut tx = pool.begin().await?;

    if let Patch::Value(wo_id) = changes.work_order_id {
        ensure_exists(&mut tx, "work_order", wo_id).await?;
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE service_request SET updated_at = ");
    qb.push_bind(util::now_millis());

    if let Some(v) = &changes.customer_name {
        qb.push(", customer_name = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.address {
        qb.push(", address = ").push_bind(v.clone());
    }
    if let Some(reasons) = &changes.reasons {
        let json = serde_json::to_string(reasons)
            .map_err(|e| RepoError::Database(format!("Failed to encode reasons: {e}")))?;
        qb.push(", reasons = ").push_bind(json);
    }
    push_patch_text(&mut qb, "service_number", &changes.service_number);
    push_patch_text(&mut qb, "phone", &changes.phone);
    push_patch_i64(&mut qb, "received_at", changes.received_at);
    push_patch_text(&mut qb, "received_by", &changes.received_by);
    push_patch_i64(&mut qb, "handled_at", changes.handled_at);
    push_patch_text(&mut qb, "handled_by", &changes.handled_by);
    push_patch_i64(&mut qb, "inspected_at", changes.inspected_at);
    push_patch_text(&mut qb, "inspected_by", &changes.inspected_by);
    push_patch_text(&mut qb, "other_reason", &changes.other_reason);
    push_patch_text(&mut qb, "action_taken", &changes.action_taken);
    push_patch_text(&mut qb, "service_cost_by", &changes.service_cost_by);
    push_patch_text(&mut qb, "handed_over_by", &changes.handed_over_by);
    push_patch_i64(&mut qb, "handed_over_at", changes.handed_over_at);
    push_patch_i64(&mut qb, "work_order_id", changes.work_order_id);

    qb.push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Service request {id} not found")));
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Service request {id} not found")))
}

/// Paginated search: `created_at DESC, id DESC`.
pub async fn search(
    pool: &SqlitePool,
    filter: &PageFilter,
) -> RepoResult<(Vec<ServiceRequest>, i64)> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM service_request WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{SELECT} WHERE 1=1"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    qb.push_bind(filter.limit);
    qb.push(" OFFSET ");
    qb.push_bind(filter.offset);

    let rows = qb.build_query_as::<ServiceRequestRow>().fetch_all(pool).await?;
    Ok((rows.into_iter().map(Into::into).collect(), total))
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PageFilter) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (customer_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR address LIKE ")
            .push_bind(pattern.clone())
            .push(" OR service_number LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.from_millis {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to_millis {
        qb.push(" AND created_at < ").push_bind(to);
    }
}

