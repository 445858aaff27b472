//! Pointscan 服务入口
//!
//! 构建注册表（可选预置扫描），通过HTTP/JSON对外提供创建、查询和更新。

mod config;
mod http;
mod routes;
mod server;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::{RegistrySettings, ServerConfig};
use crate::server::Limits;
use pointscan_registry::{seed, Registry};

#[derive(Parser, Debug)]
#[command(name = "pointscan")]
#[command(version)]
#[command(about = "Point-cloud scan registry with bounding-box derivation", long_about = None)]
struct Cli {
    /// TOML配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 监听地址，覆盖配置文件
    #[arg(long)]
    bind: Option<String>,

    /// 不预置示例扫描
    #[arg(long)]
    no_demo: bool,

    /// 预置扫描的JSON文件
    #[arg(long)]
    seed: Option<PathBuf>,

    /// 日志级别（trace, debug, info, warn, error）
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// 读取配置文件并叠加命令行参数
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if self.no_demo {
            config.registry.seed_demo = false;
        }
        if let Some(seed) = self.seed {
            config.registry.seed_file = Some(seed);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }
}

/// 按配置构建注册表：先示例扫描，再文件中的扫描
fn build_registry(settings: &RegistrySettings) -> Result<Registry> {
    let mut scans = Vec::new();
    if settings.seed_demo {
        scans.extend(seed::demo_point_sets());
    }
    if let Some(path) = &settings.seed_file {
        scans.extend(
            seed::load_seed_file(path)
                .with_context(|| format!("failed to load seed file {}", path.display()))?,
        );
    }

    let registry = Registry::with_seed(scans).context("invalid seed scan")?;
    info!("Registry ready with {} scans", registry.len());
    Ok(registry)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(config.logging.max_level()?)
            .finish(),
    )?;

    info!("Starting pointscan...");

    let registry = Arc::new(build_registry(&config.registry)?);

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    info!("Listening on {}", listener.local_addr()?);

    server::serve(
        listener,
        registry,
        Limits::from(&config.server),
        shutdown_signal(),
    )
    .await?;

    info!("Stopped");
    Ok(())
}
