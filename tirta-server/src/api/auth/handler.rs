//! Authentication Handlers

use axum::{Json, extract::State};

use crate::api::employees::verify_password;
use crate::api::{AppResponse, ok};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::{AppError, AppResult};
use shared::models::{EmployeeResponse, LoginRequest, LoginResponse};

/// POST /api/auth/login - 登录
///
/// 用户名不存在和密码错误返回同一条消息, 防止用户名枚举.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let employee = repository::employee::find_by_username(state.pool(), &req.username)
        .await?
        .ok_or_else(|| {
            tracing::warn!(target: "security", username = %req.username, "Login failed - user not found");
            AppError::invalid_credentials()
        })?;

    let password_valid = verify_password(&employee.password_hash, &req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(target: "security", username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(
            employee.id,
            &employee.username,
            &employee.display_name,
            &employee.role,
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(username = %employee.username, role = %employee.role, "Login successful");

    Ok(ok(LoginResponse {
        token,
        user: EmployeeResponse::from(employee),
    }))
}

/// GET /api/auth/me - 当前登录用户
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<EmployeeResponse>>> {
    let employee = repository::employee::find_by_id(state.pool(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", user.id)))?;
    Ok(ok(EmployeeResponse::from(employee)))
}
