//! Repository Module
//!
//! CRUD operations over the SQLite pool. Free functions taking
//! `&SqlitePool`, one module per table. Date conversion happens at
//! the handler layer; repositories only see `i64` Unix millis.

pub mod complaint;
pub mod employee;
pub mod repair_report;
pub mod service_request;
pub mod work_order;

use sqlx::{QueryBuilder, Sqlite, Transaction};
use thiserror::Error;

use shared::Patch;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Linkage target row does not exist. The attempted write is
    /// rolled back, nothing partially applies.
    #[error("Reference: {0}")]
    Reference(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Reference(msg) => AppError::reference(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Shared pagination filter for list queries.
///
/// `limit`/`offset` are pre-validated by the handler (page >= 1,
/// 1 <= pageSize <= 100). Sort contract for every list:
/// `created_at DESC, id DESC` — deterministic across pages because
/// snowflake IDs break timestamp ties.
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    /// Free-text needle, matched with LIKE against the entity's
    /// natural text columns
    pub q: Option<String>,
    /// created_at >= from_millis (inclusive)
    pub from_millis: Option<i64>,
    /// created_at < to_millis (exclusive)
    pub to_millis: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

/// Assert a linkage target exists inside the caller's transaction.
///
/// `table` is always a compile-time constant from the calling module,
/// never user input.
pub(crate) async fn ensure_exists(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    id: i64,
) -> RepoResult<()> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?");
    let row: Option<(i64,)> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut **tx).await?;
    if row.is_none() {
        return Err(RepoError::Reference(format!("{table} {id} does not exist")));
    }
    Ok(())
}

// 动态 UPDATE 的 SET 子句辅助：Missing 不生成子句，Null 清空列，
// Value 绑定新值。`column` 永远是调用方的编译期常量。

pub(crate) fn push_patch_text(
    qb: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    patch: &Patch<String>,
) {
    match patch {
        Patch::Missing => {}
        Patch::Null => {
            qb.push(format!(", {column} = NULL"));
        }
        Patch::Value(v) => {
            qb.push(format!(", {column} = ")).push_bind(v.clone());
        }
    }
}

pub(crate) fn push_patch_i64(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, patch: Patch<i64>) {
    match patch {
        Patch::Missing => {}
        Patch::Null => {
            qb.push(format!(", {column} = NULL"));
        }
        Patch::Value(v) => {
            qb.push(format!(", {column} = ")).push_bind(v);
        }
    }
}
