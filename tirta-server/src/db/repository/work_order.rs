//! Work Order Repository

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{PageFilter, RepoError, RepoResult, ensure_exists, push_patch_i64, push_patch_text};
use shared::models::{WorkOrder, WorkOrderCreate};
use shared::{Patch, util};

const SELECT: &str = "SELECT id, number, report_date, handled_date, reporter_name, handling_time, \
     disturbance_location, disturbance_type, city, city_date, executor_name, team, \
     service_request_id, created_at, updated_at FROM work_order";

/// Typed change set; dates already converted to Unix millis.
#[derive(Debug, Default)]
pub struct WorkOrderChanges {
    pub number: Option<String>,
    pub report_date: Patch<i64>,
    pub handled_date: Patch<i64>,
    pub reporter_name: Patch<String>,
    pub handling_time: Patch<String>,
    pub disturbance_location: Patch<String>,
    pub disturbance_type: Patch<String>,
    pub city: Patch<String>,
    pub city_date: Patch<i64>,
    pub executor_name: Patch<String>,
    pub team: Patch<String>,
    pub service_request_id: Patch<i64>,
}

impl WorkOrderChanges {
    fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.report_date.is_missing()
            && self.handled_date.is_missing()
            && self.reporter_name.is_missing()
            && self.handling_time.is_missing()
            && self.disturbance_location.is_missing()
            && self.disturbance_type.is_missing()
            && self.city.is_missing()
            && self.city_date.is_missing()
            && self.executor_name.is_missing()
            && self.team.is_missing()
            && self.service_request_id.is_missing()
    }
}

/// Dates for [`create`], pre-converted by the handler.
pub struct WorkOrderDates {
    pub report_date: Option<i64>,
    pub handled_date: Option<i64>,
    pub city_date: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<WorkOrder>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, WorkOrder>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    data: WorkOrderCreate,
    dates: WorkOrderDates,
) -> RepoResult<WorkOrder> {
    let now = util::now_millis();
    let id = util::snowflake_id();

    // 指令单可以在创建时就挂到服务申请单上
    let mut tx = pool.begin().await?;
    if let Some(sr_id) = data.service_request_id {
        ensure_exists(&mut tx, "service_request", sr_id).await?;
    }

    sqlx::query(
        "INSERT INTO work_order (id, number, report_date, handled_date, reporter_name, \
         handling_time, disturbance_location, disturbance_type, city, city_date, executor_name, \
         team, service_request_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.number)
    .bind(dates.report_date)
    .bind(dates.handled_date)
    .bind(&data.reporter_name)
    .bind(&data.handling_time)
    .bind(&data.disturbance_location)
    .bind(&data.disturbance_type)
    .bind(&data.city)
    .bind(dates.city_date)
    .bind(&data.executor_name)
    .bind(&data.team)
    .bind(data.service_request_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create work order".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, changes: WorkOrderChanges) -> RepoResult<WorkOrder> {
    // 空 diff 什么都不写, 连 updated_at 也不动
    if changes.is_empty() {
        return find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Work order {id} not found")));
    }

    let mut tx = pool.begin().await?;

    if let Patch::Value(sr_id) = changes.service_request_id {
        ensure_exists(&mut tx, "service_request", sr_id).await?;
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE work_order SET updated_at = ");
    qb.push_bind(util::now_millis());

    if let Some(v) = &changes.number {
        qb.push(", number = ").push_bind(v.clone());
    }
    push_patch_i64(&mut qb, "report_date", changes.report_date);
    push_patch_i64(&mut qb, "handled_date", changes.handled_date);
    push_patch_text(&mut qb, "reporter_name", &changes.reporter_name);
    push_patch_text(&mut qb, "handling_time", &changes.handling_time);
    push_patch_text(&mut qb, "disturbance_location", &changes.disturbance_location);
    push_patch_text(&mut qb, "disturbance_type", &changes.disturbance_type);
    push_patch_text(&mut qb, "city", &changes.city);
    push_patch_i64(&mut qb, "city_date", changes.city_date);
    push_patch_text(&mut qb, "executor_name", &changes.executor_name);
    push_patch_text(&mut qb, "team", &changes.team);
    push_patch_i64(&mut qb, "service_request_id", changes.service_request_id);

    qb.push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Work order {id} not found")));
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Work order {id} not found")))
}

/// Paginated search: `created_at DESC, id DESC`.
pub async fn search(pool: &SqlitePool, filter: &PageFilter) -> RepoResult<(Vec<WorkOrder>, i64)> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM work_order WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{SELECT} WHERE 1=1"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    qb.push_bind(filter.limit);
    qb.push(" OFFSET ");
    qb.push_bind(filter.offset);

    let rows = qb.build_query_as::<WorkOrder>().fetch_all(pool).await?;
    Ok((rows, total))
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PageFilter) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (number LIKE ")
            .push_bind(pattern.clone())
            .push(" OR reporter_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR disturbance_location LIKE ")
            .push_bind(pattern.clone())
            .push(" OR executor_name LIKE ")
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
