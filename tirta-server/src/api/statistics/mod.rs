//! 仪表盘统计 API 模块

mod handler;

pub use handler::StatisticsResponse;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/statistics", get(handler::get_statistics))
}
