use std::net::TcpListener;

use wiremock::MockServer;

/// Starts a mock server, or returns `None` when localhost cannot be bound.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_err() {
        eprintln!("[socket-bound-test] cannot bind localhost; skipping");
        return None;
    }
    Some(MockServer::start().await)
}
