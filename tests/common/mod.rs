//! Shared utilities for integration testing.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock rendering backend that echoes the request head (request
/// line plus headers) back as the response body, so tests can observe the
/// headers the edge propagated.
pub async fn start_echo_backend(listener: TcpListener) {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        loop {
                            match socket.read(&mut chunk).await {
                                Ok(0) => break,
                                Ok(n) => {
                                    buf.extend_from_slice(&chunk[..n]);
                                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                }
                                Err(_) => return,
                            }
                        }

                        let head = String::from_utf8_lossy(&buf);
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            head.len(),
                            head
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Pull a propagated request header out of an echoed request head.
#[allow(dead_code)]
pub fn echoed_header<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let prefix = format!("{name}: ");
    body.lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(str::trim_end)
}
