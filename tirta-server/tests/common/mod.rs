//! 集成测试通用设施
//!
//! 真实路由 + 内存 SQLite, 通过 tower 的 oneshot 发请求.

// 各个测试二进制只用到子集
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tirta_server::db::{DbService, bootstrap};
use tirta_server::{Config, JwtService, ServerState, api};

pub const ADMIN_PASSWORD: &str = "rahasia-tirta";

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tmp = std::env::temp_dir();
        let config = Config::with_overrides(tmp.display().to_string(), 0);

        let db = DbService::new_in_memory()
            .await
            .expect("in-memory database");
        bootstrap::ensure_admin(db.pool(), ADMIN_PASSWORD)
            .await
            .expect("bootstrap admin");

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let state = ServerState::new(config, db, jwt_service);
        let router = api::build_app(&state).with_state(state);

        Self { router }
    }

    /// 发送一个请求, 返回 (状态码, 响应 JSON)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router oneshot");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response is JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login("admin", ADMIN_PASSWORD).await
    }
}

/// 后续断言用: 从信封响应里取 data
pub fn data(body: &Value) -> &Value {
    &body["data"]
}
