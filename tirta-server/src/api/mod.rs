//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`complaints`] - 投诉管理接口
//! - [`service_requests`] - 服务申请单管理接口
//! - [`work_orders`] - 工作指令单管理接口
//! - [`repair_reports`] - 维修报告管理接口
//! - [`employees`] - 员工管理接口 (仅管理员)
//! - [`statistics`] - 仪表盘统计接口

pub mod auth;
pub mod complaints;
pub mod employees;
pub mod health;
pub mod repair_reports;
pub mod service_requests;
pub mod statistics;
pub mod work_orders;

use axum::{Router, middleware};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::db::repository::PageFilter;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResponse, AppResult, ok};

/// 分页列表查询参数
///
/// 所有列表接口共用同一套契约:
/// `q` 自由文本, `from`/`to` 业务时区的日期 (YYYY-MM-DD, from 含当天,
/// to 含当天), `page` 从 1 开始, `pageSize` 默认 20 / 上限 100.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub q: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// 校验并转换为仓库层过滤器, 任何 SQL 执行之前完成.
    pub fn into_filter(self, tz: Tz) -> AppResult<(PageFilter, i64, i64)> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::validation("page must be >= 1"));
        }
        let page_size = self.page_size.unwrap_or(20);
        if !(1..=100).contains(&page_size) {
            return Err(AppError::validation("pageSize must be between 1 and 100"));
        }

        // offset = (page - 1) * page_size 不能溢出 i64
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(page_size))
            .ok_or_else(|| AppError::validation("page is out of range"))?;

        let from_millis = match &self.from {
            Some(s) => Some(day_start_millis(parse_date(s, "from")?, tz)),
            None => None,
        };
        let to_millis = match &self.to {
            Some(s) => Some(day_end_millis(parse_date(s, "to")?, tz)),
            None => None,
        };

        let q = self.q.filter(|s| !s.trim().is_empty());

        let filter = PageFilter {
            q,
            from_millis,
            to_millis,
            limit: page_size,
            offset,
        };
        Ok((filter, page, page_size))
    }
}

/// 分页响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        // ceiling division; empty result set still reports 0 pages
        let total_pages = (total + page_size - 1) / page_size;
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the bare router (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(complaints::router())
        .merge(service_requests::router())
        .merge(work_orders::router())
        .merge(repair_reports::router())
        .merge(employees::router())
        .merge(statistics::router())
}

/// Build the full application: router + auth middleware + tower-http stack.
///
/// The caller finishes with `.with_state(state)`.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(log_request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tz() -> Tz {
        "Asia/Jakarta".parse().unwrap()
    }

    #[test]
    fn page_query_defaults() {
        let (filter, page, page_size) = PageQuery::default().into_filter(tz()).unwrap();
        assert_eq!(page, 1);
        assert_eq!(page_size, 20);
        assert_eq!(filter.limit, 20);
        assert_eq!(filter.offset, 0);
        assert!(filter.q.is_none());
    }

    #[test]
    fn page_query_rejects_out_of_range() {
        let q = PageQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(q.into_filter(tz()).is_err());

        let q = PageQuery {
            page_size: Some(101),
            ..Default::default()
        };
        assert!(q.into_filter(tz()).is_err());

        let q = PageQuery {
            from: Some("2025-13-01".into()),
            ..Default::default()
        };
        assert!(q.into_filter(tz()).is_err());

        // 荒谬大的 page 直接拒绝而不是让 offset 溢出
        let q = PageQuery {
            page: Some(i64::MAX),
            ..Default::default()
        };
        assert!(q.into_filter(tz()).is_err());
    }

    #[test]
    fn page_query_offset_math() {
        let q = PageQuery {
            page: Some(3),
            page_size: Some(50),
            ..Default::default()
        };
        let (filter, _, _) = q.into_filter(tz()).unwrap();
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.offset, 100);
    }

    #[test]
    fn paginated_total_pages() {
        let p = Paginated::new(Vec::<i64>::new(), 41, 1, 20);
        assert_eq!(p.total_pages, 3);
        let p = Paginated::new(Vec::<i64>::new(), 0, 1, 20);
        assert_eq!(p.total_pages, 0);
        let p = Paginated::new(Vec::<i64>::new(), 40, 2, 20);
        assert_eq!(p.total_pages, 2);
    }
}
