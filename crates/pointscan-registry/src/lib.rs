//! Pointscan 扫描注册表
//!
//! 支持：
//! - 标识分配（从1开始单调递增）
//! - 按标识查询、部分更新
//! - 启动时从示例数据或JSON文件预置扫描

pub mod error;
pub mod registry;
pub mod seed;

pub use error::RegistryError;
pub use registry::Registry;
