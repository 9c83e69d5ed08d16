//! Repair Report Repository
//!
//! 报告正文按不透明 JSON 文本存储, 读出时再反序列化.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{PageFilter, RepoError, RepoResult};
use shared::models::RepairReport;
use shared::util;

#[derive(Debug, sqlx::FromRow)]
struct RepairReportRow {
    id: i64,
    content: String,
    created_at: i64,
    updated_at: i64,
}

impl From<RepairReportRow> for RepairReport {
    fn from(row: RepairReportRow) -> Self {
        let content = serde_json::from_str(&row.content).unwrap_or_default();
        RepairReport {
            id: row.id,
            content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT: &str = "SELECT id, content, created_at, updated_at FROM repair_report";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RepairReport>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, RepairReportRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(RepairReport::from))
}

pub async fn create(pool: &SqlitePool, content: &serde_json::Value) -> RepoResult<RepairReport> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    let text = serde_json::to_string(content)
        .map_err(|e| RepoError::Database(format!("Failed to encode report content: {e}")))?;

    sqlx::query("INSERT INTO repair_report (id, content, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(text)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create repair report".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    content: Option<&serde_json::Value>,
) -> RepoResult<RepairReport> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE repair_report SET updated_at = ");
    qb.push_bind(util::now_millis());

    if let Some(value) = content {
        let text = serde_json::to_string(value)
            .map_err(|e| RepoError::Database(format!("Failed to encode report content: {e}")))?;
        qb.push(", content = ").push_bind(text);
    }

    qb.push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Repair report {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Repair report {id} not found")))
}

/// Paginated list: `created_at DESC, id DESC`. Free-text search matches
/// against the raw JSON text.
pub async fn search(
    pool: &SqlitePool,
    filter: &PageFilter,
) -> RepoResult<(Vec<RepairReport>, i64)> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM repair_report WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{SELECT} WHERE 1=1"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    qb.push_bind(filter.limit);
    qb.push(" OFFSET ");
    qb.push_bind(filter.offset);

    let rows = qb.build_query_as::<RepairReportRow>().fetch_all(pool).await?;
    Ok((rows.into_iter().map(RepairReport::from).collect(), total))
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PageFilter) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND content LIKE ").push_bind(pattern);
    }
    if let Some(from) = filter.from_millis {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to_millis {
        qb.push(" AND created_at < ").push_bind(to);
    }
}
