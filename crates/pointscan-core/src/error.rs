//! 几何引擎错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// 点集为空、坐标非有限值等输入问题
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
