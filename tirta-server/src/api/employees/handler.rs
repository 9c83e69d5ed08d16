//! Employee API Handlers
//!
//! 全部接口要求管理员角色. 员工不做物理删除, DELETE 只是停用账号.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::{AppResponse, ok};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{self, employee::EmployeeChanges};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, validate_one_of, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Employee, EmployeeCreate, EmployeeResponse, EmployeeUpdate, ROLES};

/// Hash password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify password against a stored argon2 hash
pub fn verify_password(hash: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// GET /api/employees - 员工列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<EmployeeResponse>>>> {
    user.require_admin()?;
    let employees = repository::employee::find_all(state.pool()).await?;
    Ok(ok(employees.into_iter().map(EmployeeResponse::from).collect()))
}

/// GET /api/employees/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<EmployeeResponse>>> {
    user.require_admin()?;
    let employee = find_or_404(&state, id).await?;
    Ok(ok(EmployeeResponse::from(employee)))
}

/// POST /api/employees - 创建员工账号
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<AppResponse<EmployeeResponse>>> {
    user.require_admin()?;

    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.display_name, "displayName", MAX_NAME_LEN)?;
    validate_one_of(&payload.role, "role", ROLES)?;
    validate_password(&payload.password)?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let employee = repository::employee::create(state.pool(), payload, password_hash).await?;
    tracing::info!(username = %employee.username, role = %employee.role, "Employee created");
    Ok(ok(EmployeeResponse::from(employee)))
}

/// PUT /api/employees/{id} - 更新员工账号
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<AppResponse<EmployeeResponse>>> {
    user.require_admin()?;

    if let Some(v) = &payload.display_name {
        validate_required_text(v, "displayName", MAX_NAME_LEN)?;
    }
    if let Some(v) = &payload.role {
        validate_one_of(v, "role", ROLES)?;
    }

    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
            )
        }
        None => None,
    };

    let changes = EmployeeChanges {
        password_hash,
        display_name: payload.display_name,
        role: payload.role,
        is_active: payload.is_active,
    };

    let employee = repository::employee::update(state.pool(), id, changes).await?;
    Ok(ok(EmployeeResponse::from(employee)))
}

/// DELETE /api/employees/{id} - 停用账号 (软删除)
pub async fn deactivate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<EmployeeResponse>>> {
    user.require_admin()?;

    // 不允许停掉自己, 避免把最后一个管理员锁在门外
    if user.id == id {
        return Err(AppError::validation("Cannot deactivate your own account"));
    }

    let changes = EmployeeChanges {
        is_active: Some(false),
        ..Default::default()
    };
    let employee = repository::employee::update(state.pool(), id, changes).await?;
    tracing::info!(username = %employee.username, "Employee deactivated");
    Ok(ok(EmployeeResponse::from(employee)))
}

async fn find_or_404(state: &ServerState, id: i64) -> AppResult<Employee> {
    repository::employee::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {id}")))
}
