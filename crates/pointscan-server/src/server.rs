//! 连接接收循环

use crate::config::HttpSettings;
use crate::http::{read_request, write_response, HttpError};
use crate::routes;
use pointscan_registry::Registry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// 单个请求的读取限制
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl From<&HttpSettings> for Limits {
    fn from(settings: &HttpSettings) -> Self {
        Self {
            request_timeout: settings.request_timeout(),
            max_body_bytes: settings.max_body_bytes,
        }
    }
}

/// 接收连接直到 `shutdown` 完成
///
/// 每个连接在独立任务中处理，注册表通过 `Arc` 共享。
pub async fn serve(
    listener: TcpListener,
    registry: Arc<Registry>,
    limits: Limits,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let registry = Arc::clone(&registry);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, &registry, limits).await {
                            error!(%peer, "Connection error: {}", e);
                        }
                    });
                }
                Err(e) => error!("Failed to accept connection: {}", e),
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: &Registry,
    limits: Limits,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let pending = read_request(&mut reader, limits.max_body_bytes);
    let response = match tokio::time::timeout(limits.request_timeout, pending).await {
        Ok(Ok(request)) => {
            debug!(%peer, method = %request.method, path = %request.path, "Received request");
            let response = routes::handle(registry, &request);
            info!(
                %peer,
                method = %request.method,
                path = %request.path,
                status = response.status.code(),
                "Handled request"
            );
            response
        }
        Ok(Err(HttpError::ConnectionClosed)) => return Ok(()),
        Ok(Err(HttpError::Io(e))) => return Err(e),
        Ok(Err(e)) => {
            warn!(%peer, "Rejected request: {}", e);
            e.into_response()
        }
        Err(_) => {
            warn!(%peer, "Request timed out after {:?}", limits.request_timeout);
            HttpError::Timeout.into_response()
        }
    };

    write_response(&mut write_half, &response).await?;
    write_half.shutdown().await
}
