//! Statistics Handlers
//!
//! 纯聚合查询. 月份分桶在 Rust 侧按业务时区完成,
//! SQLite 端只做计数 (它不认识命名时区).

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::api::{AppResponse, ok};
use crate::core::ServerState;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintTotals {
    pub total: i64,
    pub processed: i64,
    pub open: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// "YYYY-MM" (业务时区)
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBearerCount {
    pub cost_bearer: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub complaints: ComplaintTotals,
    pub by_category: Vec<CategoryCount>,
    pub monthly_trend: Vec<MonthCount>,
    pub service_requests_by_cost_bearer: Vec<CostBearerCount>,
}

/// GET /api/statistics?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn get_statistics(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<AppResponse<StatisticsResponse>>> {
    let tz = state.config.business_timezone;
    let from = match &query.from {
        Some(s) => Some(day_start_millis(parse_date(s, "from")?, tz)),
        None => None,
    };
    let to = match &query.to {
        Some(s) => Some(day_end_millis(parse_date(s, "to")?, tz)),
        None => None,
    };
    let pool = state.pool();

    let total = count_where(pool, "complaint", "1=1", from, to).await?;
    let processed = count_where(pool, "complaint", "processed_at IS NOT NULL", from, to).await?;

    let by_category = group_count(pool, "complaint", "category", from, to)
        .await?
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();

    let monthly_trend = monthly_trend(pool, from, to, tz).await?;

    let service_requests_by_cost_bearer =
        group_count(pool, "service_request", "service_cost_by", from, to)
            .await?
            .into_iter()
            .map(|(cost_bearer, count)| CostBearerCount { cost_bearer, count })
            .collect();

    Ok(ok(StatisticsResponse {
        complaints: ComplaintTotals {
            total,
            processed,
            open: total - processed,
        },
        by_category,
        monthly_trend,
        service_requests_by_cost_bearer,
    }))
}

fn push_range(qb: &mut QueryBuilder<'_, Sqlite>, from: Option<i64>, to: Option<i64>) {
    if let Some(from) = from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = to {
        qb.push(" AND created_at < ").push_bind(to);
    }
}

async fn count_where(
    pool: &SqlitePool,
    table: &str,
    predicate: &str,
    from: Option<i64>,
    to: Option<i64>,
) -> AppResult<i64> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {table} WHERE {predicate}"));
    push_range(&mut qb, from, to);
    let count: i64 = qb
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(count)
}

async fn group_count(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    from: Option<i64>,
    to: Option<i64>,
) -> AppResult<Vec<(String, i64)>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {column}, COUNT(*) FROM {table} WHERE {column} IS NOT NULL"
    ));
    push_range(&mut qb, from, to);
    qb.push(format!(" GROUP BY {column} ORDER BY COUNT(*) DESC"));
    let rows: Vec<(String, i64)> = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(rows)
}

async fn monthly_trend(
    pool: &SqlitePool,
    from: Option<i64>,
    to: Option<i64>,
    tz: Tz,
) -> AppResult<Vec<MonthCount>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT created_at FROM complaint WHERE 1=1");
    push_range(&mut qb, from, to);
    qb.push(" ORDER BY created_at ASC");

    let stamps: Vec<i64> = qb
        .build_query_scalar()
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let mut trend: Vec<MonthCount> = Vec::new();
    for millis in stamps {
        let Some(dt) = DateTime::from_timestamp_millis(millis) else {
            continue;
        };
        let local = dt.with_timezone(&tz);
        let month = format!("{:04}-{:02}", local.year(), local.month());
        match trend.last_mut() {
            Some(last) if last.month == month => last.count += 1,
            _ => trend.push(MonthCount { month, count: 1 }),
        }
    }
    Ok(trend)
}
