//! 服务配置
//!
//! 从可选的TOML文件读取，所有字段都有默认值，没有配置文件也能启动。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// 顶层配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub server: HttpSettings,
    pub registry: RegistrySettings,
    pub logging: LoggingSettings,
}

/// HTTP监听与请求限制
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// 监听地址，例如 `127.0.0.1:5000`
    pub bind_address: String,
    /// 读取完整请求的超时（毫秒）
    pub request_timeout_ms: u64,
    /// 请求体上限（字节）
    pub max_body_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            request_timeout_ms: 5_000,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// 注册表预置数据
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// 是否预置内置示例扫描
    pub seed_demo: bool,
    /// 额外的预置扫描文件（JSON）
    pub seed_file: Option<PathBuf>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            seed_demo: true,
            seed_file: None,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    pub fn max_level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", self.level, e))
    }
}

impl ServerConfig {
    /// 从TOML文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// 检查配置值是否可用
    pub fn validate(&self) -> Result<()> {
        self.logging.max_level()?;
        anyhow::ensure!(
            self.server.request_timeout_ms > 0,
            "request_timeout_ms must be positive"
        );
        anyhow::ensure!(
            self.server.max_body_bytes > 0,
            "max_body_bytes must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.server.request_timeout(), Duration::from_secs(5));
        assert!(config.registry.seed_demo);
        assert!(config.registry.seed_file.is_none());
        assert_eq!(config.logging.max_level().unwrap(), Level::INFO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            [server]
            bind_address = "0.0.0.0:8080"

            [registry]
            seed_demo = false
            seed_file = "scans.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert!(!config.registry.seed_demo);
        assert_eq!(config.registry.seed_file, Some(PathBuf::from("scans.json")));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ServerConfig::from_toml("[server]\nport = 80\n").is_err());

        let config = ServerConfig::from_toml("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = ServerConfig::from_toml("[server]\nrequest_timeout_ms = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.max_level().unwrap(), Level::DEBUG);

        assert!(ServerConfig::from_file("/nonexistent/pointscan.toml").is_err());
    }
}
