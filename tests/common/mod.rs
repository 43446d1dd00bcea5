//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock upstream returning a fixed response on every connection.
///
/// The response is assembled once up front; each accepted connection gets
/// the request head drained before the canned reply is written.
pub async fn start_mock_upstream(
    addr: SocketAddr,
    status_line: &str,
    headers: &[(&str, &str)],
    body: &str,
) {
    let listener = TcpListener::bind(addr).await.unwrap();

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n",
        status_line,
        body.len()
    );
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("Connection: close\r\n\r\n");
    response.push_str(body);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let response = response.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
