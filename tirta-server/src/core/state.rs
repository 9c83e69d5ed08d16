use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{self, DbService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，每个请求克隆一份的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务 (SQLite WAL)
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (确保存在)
    /// 2. 数据库 (迁移 + 引导管理员账号)
    /// 3. JWT 服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir exists
        std::fs::create_dir_all(&config.work_dir).expect("Failed to create work directory");

        // 1. Initialize DB
        let db = DbService::new(&config.database_path)
            .await
            .expect("Failed to initialize database");

        // 2. Bootstrap the admin account on first run
        db::bootstrap::ensure_admin(db.pool(), &config.bootstrap_admin_password)
            .await
            .expect("Failed to bootstrap admin employee");

        // 3. JWT service
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        Self::new(config.clone(), db, jwt_service)
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
