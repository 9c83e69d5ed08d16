//! Complaint Repository
//!
//! 投诉生命周期的持久化：创建、三态部分更新、分页查询。
//! 链接字段 (service_request_id / work_order_id / repair_report_id)
//! 的存在性检查和 UPDATE 在同一个事务里执行，目标不存在时整个
//! 更新不生效。

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{PageFilter, RepoError, RepoResult, ensure_exists, push_patch_i64, push_patch_text};
use shared::models::{Complaint, ComplaintCreate};
use shared::{Patch, util};

const SELECT: &str = "SELECT id, customer_name, address, complaint_text, category, phone, \
     maps_link, connection_number, processed_at, service_request_id, work_order_id, \
     repair_report_id, created_at, updated_at FROM complaint";

/// Typed change set for [`update`]. Built by the handler after
/// validation; timestamps already converted to Unix millis.
///
/// Two-state `Option` fields: absent = unchanged. Three-state
/// [`Patch`] fields additionally distinguish "clear" from "absent".
#[derive(Debug, Default)]
pub struct ComplaintChanges {
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub complaint_text: Option<String>,
    pub category: Option<String>,
    pub phone: Patch<String>,
    pub maps_link: Patch<String>,
    pub connection_number: Patch<String>,
    pub processed_at: Patch<i64>,
    pub service_request_id: Patch<i64>,
    pub work_order_id: Patch<i64>,
    pub repair_report_id: Patch<i64>,
}

impl ComplaintChanges {
    fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.address.is_none()
            && self.complaint_text.is_none()
            && self.category.is_none()
            && self.phone.is_missing()
            && self.maps_link.is_missing()
            && self.connection_number.is_missing()
            && self.processed_at.is_missing()
            && self.service_request_id.is_missing()
            && self.work_order_id.is_missing()
            && self.repair_report_id.is_missing()
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Complaint>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Complaint>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a complaint. All linkage fields start unset; `processed_at`
/// is whatever the caller validated (usually None at intake).
pub async fn create(
    pool: &SqlitePool,
    data: ComplaintCreate,
    maps_link: Option<String>,
    processed_at: Option<i64>,
) -> RepoResult<Complaint> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    sqlx::query(
        "INSERT INTO complaint (id, customer_name, address, complaint_text, category, phone, \
         maps_link, connection_number, processed_at, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.customer_name)
    .bind(&data.address)
    .bind(&data.complaint_text)
    .bind(&data.category)
    .bind(&data.phone)
    .bind(&maps_link)
    .bind(&data.connection_number)
    .bind(processed_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create complaint".into()))
}

/// Apply a change set to one complaint row.
///
/// Single transaction: linkage existence checks first, then one
/// dynamically built UPDATE with exactly one SET clause per present
/// field. Absent fields are never touched, so concurrent updates to
/// disjoint fields both apply.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: ComplaintChanges,
) -> RepoResult<Complaint> {
    // 空 diff：什么都不写 (连 updated_at 也不动)，只确认目标存在
    if changes.is_empty() {
        return find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Complaint {id} not found")));
    }

    let mut tx = pool.begin().await?;

    // 链接目标必须存在，否则整个更新回滚
    if let Patch::Value(sr_id) = changes.service_request_id {
        ensure_exists(&mut tx, "service_request", sr_id).await?;
    }
    if let Patch::Value(wo_id) = changes.work_order_id {
        ensure_exists(&mut tx, "work_order", wo_id).await?;
    }
    if let Patch::Value(rr_id) = changes.repair_report_id {
        ensure_exists(&mut tx, "repair_report", rr_id).await?;
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE complaint SET updated_at = ");
    qb.push_bind(util::now_millis());

    if let Some(v) = &changes.customer_name {
        qb.push(", customer_name = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.address {
        qb.push(", address = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.complaint_text {
        qb.push(", complaint_text = ").push_bind(v.clone());
    }
    if let Some(v) = &changes.category {
        qb.push(", category = ").push_bind(v.clone());
    }
    push_patch_text(&mut qb, "phone", &changes.phone);
    push_patch_text(&mut qb, "maps_link", &changes.maps_link);
    push_patch_text(&mut qb, "connection_number", &changes.connection_number);
    push_patch_i64(&mut qb, "processed_at", changes.processed_at);
    push_patch_i64(&mut qb, "service_request_id", changes.service_request_id);
    push_patch_i64(&mut qb, "work_order_id", changes.work_order_id);
    push_patch_i64(&mut qb, "repair_report_id", changes.repair_report_id);

    qb.push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Complaint {id} not found")));
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Complaint {id} not found")))
}

/// Paginated search. Sort contract: `created_at DESC, id DESC`.
/// Returns the page plus the total match count.
pub async fn search(pool: &SqlitePool, filter: &PageFilter) -> RepoResult<(Vec<Complaint>, i64)> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM complaint WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{SELECT} WHERE 1=1"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    qb.push_bind(filter.limit);
    qb.push(" OFFSET ");
    qb.push_bind(filter.offset);

    let rows = qb.build_query_as::<Complaint>().fetch_all(pool).await?;
    Ok((rows, total))
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PageFilter) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (customer_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR address LIKE ")
            .push_bind(pattern.clone())
            .push(" OR complaint_text LIKE ")
            .push_bind(pattern.clone())
            .push(" OR connection_number LIKE ")
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