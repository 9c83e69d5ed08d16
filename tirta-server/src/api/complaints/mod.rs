//! Complaint API 模块

mod handler;

pub use handler::ComplaintDetail;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/complaints", complaint_routes())
}

fn complaint_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/detail", get(handler::get_detail))
}
