//! Sequential HTTP listener.
//!
//! Connections are served one at a time: each accepted connection is driven
//! to completion (maintenance included) before the next `accept`. Keep-alive
//! is disabled so a client cannot hold the loop past its one request, and
//! header reads are bounded so a stalled client cannot hold it forever.
//!
//! Malformed framing (for example a non-numeric `Content-Length`) is rejected
//! by the HTTP codec itself with a bare `400` before any handler runs.

use std::future::Future;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Time allowed for a client to send the complete request head.
pub const DEFAULT_HEADER_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub header_read_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            header_read_timeout: DEFAULT_HEADER_READ_TIMEOUT,
        }
    }
}

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// A connection that is in flight when `shutdown` fires is allowed to finish
/// its current response before the listener is dropped.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    config: &ListenerConfig,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut builder = http1::Builder::new();
    builder
        .keep_alive(false)
        .timer(TokioTimer::new())
        .header_read_timeout(config.header_read_timeout);

    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Accept error: {}", e);
                    continue;
                }
            },
        };
        debug!("Accepted connection from {}", peer);

        let service = TowerToHyperService::new(router.clone());
        let conn = builder.serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);

        let stopping = tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    warn!("Connection error from {}: {}", peer, e);
                }
                false
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, finishing request from {}", peer);
                conn.as_mut().graceful_shutdown();
                if let Err(e) = conn.as_mut().await {
                    warn!("Connection error from {}: {}", peer, e);
                }
                true
            }
        };
        if stopping {
            break;
        }
    }

    info!("Stopping server...");
    drop(listener);
    info!("Server stopped");
    Ok(())
}
