//! 健康检查 API (公共路由, 不需要认证)

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::api::{AppResponse, ok};
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::util;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health
async fn health(State(state): State<ServerState>) -> AppResult<Json<AppResponse<HealthStatus>>> {
    // 顺带确认数据库可达
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await
        .map_err(|e| crate::utils::AppError::database(e.to_string()))?;

    Ok(ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: util::now_millis(),
    }))
}
