//! Tirta Server - 供水客服工单管理系统
//!
//! 面向供水公司客服/分销部门的投诉与工单管理后端:
//! 投诉 → 服务申请单 → 工作指令单 → 维修报告 的完整生命周期.
//!
//! # 模块结构
//!
//! ```text
//! tirta-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── auth/          # JWT 认证、角色权限、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池、迁移、仓库
//! └── utils/         # 错误类型、校验、时间换算、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
///
/// 在读取 [`Config`] 之前调用, `.env` 里的变量才会生效.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  _____ _      _
 |_   _(_)_ __| |_ __ _
   | | | | '__| __/ _` |
   | | | | |  | || (_| |
   |_| |_|_|   \__\__,_|
    "#
    );
}
