//! Tirta 共享类型库
//!
//! 服务端与前端共享的数据模型和工具：
//!
//! - **数据模型** (`models`): 投诉、服务申请、工作指令、维修报告等实体
//! - **Patch 类型** (`patch`): 区分 "缺失 / null / 有值" 三态的部分更新字段
//! - **工具** (`util`): 时间戳和雪花 ID

pub mod models;
pub mod patch;
pub mod util;

pub use patch::Patch;
