//! 文件数据库冒烟测试: 迁移 + 引导管理员在 WAL 模式下工作

use tirta_server::db::{DbService, bootstrap};

#[tokio::test]
async fn file_backed_database_migrates_and_bootstraps() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("tirta.db");

    let db = DbService::new(db_path.to_str().unwrap())
        .await
        .expect("open file-backed database");

    bootstrap::ensure_admin(db.pool(), "kata-sandi-awal")
        .await
        .expect("bootstrap admin");
    // 二次调用必须是幂等的
    bootstrap::ensure_admin(db.pool(), "kata-sandi-awal")
        .await
        .expect("bootstrap is idempotent");

    let admins: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employee WHERE role = 'admin'")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(admins, 1);
}
