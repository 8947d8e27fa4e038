//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned REST responses keyed by request path.
pub type Routes = HashMap<&'static str, (u16, String)>;

/// Start a mock node REST gateway on an ephemeral port.
///
/// Unknown paths answer 404. Every requested path is recorded.
pub async fn start_mock_node(routes: Routes) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let routes = routes.clone();
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();
                        seen.lock().unwrap().push(path.clone());

                        let (status, body) = routes
                            .get(path.as_str())
                            .cloned()
                            .unwrap_or((404, "{\"code\":\"ResourceNotFound\"}".to_string()));
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, requests)
}

/// Routes of a healthy node reporting `generation_hash`.
#[allow(dead_code)]
pub fn node_routes(generation_hash: &str) -> Routes {
    let mut routes = Routes::new();
    routes.insert(
        "/network/properties",
        (
            200,
            r#"{"network":{"identifier":"testnet","epochAdjustment":"1615853185s"},"chain":{"currencyMosaicId":"0x3A84'16DB'2D53'B6C8"}}"#
                .to_string(),
        ),
    );
    routes.insert(
        "/node/info",
        (
            200,
            format!(r#"{{"version":16777987,"networkGenerationHashSeed":"{}"}}"#, generation_hash),
        ),
    );
    routes.insert(
        "/mosaics/3A8416DB2D53B6C8",
        (200, r#"{"mosaic":{"id":"3A8416DB2D53B6C8","divisibility":6}}"#.to_string()),
    );
    routes
}
