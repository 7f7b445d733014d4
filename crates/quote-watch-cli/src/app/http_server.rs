//! 快照只读 HTTP 接口
//!
//! `GET /stocks`（或 `GET /`）返回最近一份快照的 JSON 数组，始终是 200。
//! 每个连接一个 task，单个连接出错只记日志

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use quote_watch_services::SnapshotService;

const MAX_REQUEST_HEAD: usize = 8 * 1024;
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// 接受连接直到 `shutdown` 完成
pub async fn serve(
    listener: TcpListener,
    service: Arc<SnapshotService>,
    shutdown: impl Future<Output = ()>,
) {
    if let Ok(addr) = listener.local_addr() {
        info!("🌐 快照接口已启动: http://{}/stocks", addr);
    }
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let service = service.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, service).await {
                            warn!("处理连接 {} 失败: {}", peer, e);
                        }
                    });
                }
                Err(e) => error!("接受连接失败: {}", e),
            },
            _ = &mut shutdown => {
                info!("快照接口停止接受新连接");
                break;
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    service: Arc<SnapshotService>,
) -> Result<()> {
    let head = tokio::time::timeout(READ_TIMEOUT, read_request_head(&mut stream)).await??;
    let Some((method, path)) = parse_request_line(&head) else {
        return write_response(&mut stream, 400, "Bad Request", "text/plain", "bad request").await;
    };
    debug!("{} {} {}", peer, method, path);

    match route(&method, &path) {
        Route::Snapshot => {
            let body = service.snapshot_json().await;
            write_response(&mut stream, 200, "OK", "application/json", &body).await
        }
        Route::NotFound => {
            write_response(&mut stream, 404, "Not Found", "text/plain", "not found").await
        }
        Route::MethodNotAllowed => {
            write_response(
                &mut stream,
                405,
                "Method Not Allowed",
                "text/plain",
                "method not allowed",
            )
            .await
        }
    }
}

/// 读到空行为止，只需要请求行
async fn read_request_head(stream: &mut TcpStream) -> Result<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() >= MAX_REQUEST_HEAD {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn parse_request_line(head: &str) -> Option<(String, String)> {
    let line = head.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let path = target.split(['?', '#']).next().unwrap_or(target).to_string();
    Some((method, path))
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Snapshot,
    NotFound,
    MethodNotAllowed,
}

fn route(method: &str, path: &str) -> Route {
    let path = path.trim_end_matches('/');
    if !(path.is_empty() || path == "/stocks") {
        return Route::NotFound;
    }
    if method == "GET" {
        Route::Snapshot
    } else {
        Route::MethodNotAllowed
    }
}

async fn write_response(
    stream: &mut TcpStream,
    status: u16,
    reason: &str,
    content_type: &str,
    body: &str,
) -> Result<()> {
    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        reason,
        content_type,
        body.len()
    );
    if status == 405 {
        response.push_str("Allow: GET\r\n");
    }
    response.push_str("\r\n");
    response.push_str(body);

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
