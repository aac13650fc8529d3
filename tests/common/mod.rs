//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use webapp::app::{set_logger, AppOption, Application};
use webapp::observability::logging::{self, LogBuffer};
use webapp::Config;

/// Build an application whose logs are captured in memory.
pub fn app_with_logs(config: Config, mut options: Vec<AppOption>) -> (Application, LogBuffer) {
    let logs = LogBuffer::default();
    options.insert(0, set_logger(logging::dispatch_with_filter(logs.clone(), false, None)));
    (Application::with_config(config, options), logs)
}

pub fn config(env: &str) -> Config {
    Config {
        env: env.to_string(),
        ..Config::default()
    }
}

/// Bind an ephemeral loopback listener.
pub async fn local_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Read from `stream` until the peer closes it. Panics after `limit`.
pub async fn read_until_closed(stream: &mut TcpStream, limit: Duration) -> Vec<u8> {
    let mut received = Vec::new();
    let result = tokio::time::timeout(limit, async {
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => received.extend_from_slice(&buf[..n]),
            }
        }
    })
    .await;
    assert!(result.is_ok(), "connection still open after {:?}", limit);
    received
}
