//! Employee Repository
//!
//! 密码散列由 API 层生成, 仓库只负责存取. 员工不做物理删除,
//! 停用通过 is_active 标记.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate};
use shared::util;

const SELECT: &str = "SELECT id, username, password_hash, display_name, role, is_active, \
     created_at, updated_at FROM employee";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Login lookup; inactive accounts are invisible here.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("{SELECT} WHERE username = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!("{SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count_admins(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employee WHERE role = 'admin' AND is_active = 1")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// `data.password` is ignored; the caller passes the Argon2 hash separately.
pub async fn create(
    pool: &SqlitePool,
    data: EmployeeCreate,
    password_hash: String,
) -> RepoResult<Employee> {
    let now = util::now_millis();
    let id = util::snowflake_id();

    let result = sqlx::query(
        "INSERT INTO employee (id, username, password_hash, display_name, role, is_active, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&password_hash)
    .bind(&data.display_name)
    .bind(&data.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }
        Err(e) => return Err(e.into()),
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Typed change set; password already hashed by the caller.
#[derive(Debug, Default)]
pub struct EmployeeChanges {
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(pool: &SqlitePool, id: i64, changes: EmployeeChanges) -> RepoResult<Employee> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE employee SET updated_at = ");
    qb.push_bind(util::now_millis());

    if let Some(v) = changes.password_hash {
        qb.push(", password_hash = ").push_bind(v);
    }
    if let Some(v) = changes.display_name {
        qb.push(", display_name = ").push_bind(v);
    }
    if let Some(v) = changes.role {
        qb.push(", role = ").push_bind(v);
    }
    if let Some(v) = changes.is_active {
        qb.push(", is_active = ").push_bind(v);
    }

    qb.push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}
