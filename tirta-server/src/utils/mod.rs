//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResponse`] - 应用错误与响应结构
//! - [`validation`] - 输入校验辅助
//! - [`time`] - 业务时区时间换算
//! - [`logger`] - 日志初始化

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok};
pub use result::AppResult;
