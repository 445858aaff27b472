//! 注册表错误定义

use pointscan_core::scan::ScanId;
use pointscan_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Scan {0} doesn't exist")]
    NotFound(ScanId),

    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
