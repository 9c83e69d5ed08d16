//! 首次启动引导
//!
//! 数据库为空时创建默认管理员账号，否则无人能登录。

use sqlx::SqlitePool;

use crate::api::employees::hash_password;
use crate::db::repository::{RepoResult, employee};
use shared::models::EmployeeCreate;

/// Ensure at least one active admin employee exists.
///
/// The password comes from `BOOTSTRAP_ADMIN_PASSWORD`; the default
/// triggers a loud warning so it gets changed after first login.
pub async fn ensure_admin(pool: &SqlitePool, password: &str) -> RepoResult<()> {
    if employee::count_admins(pool).await? > 0 {
        return Ok(());
    }

    let password_hash = hash_password(password)
        .map_err(|e| crate::db::repository::RepoError::Database(e.to_string()))?;

    employee::create(
        pool,
        EmployeeCreate {
            username: "admin".to_string(),
            password: String::new(), // hashed value passed separately
            display_name: "Administrator".to_string(),
            role: "admin".to_string(),
        },
        password_hash,
    )
    .await?;

    if password == "admin" {
        tracing::warn!("⚠️  Bootstrap admin created with DEFAULT password - change it immediately");
    } else {
        tracing::info!("Bootstrap admin employee created");
    }

    Ok(())
}
