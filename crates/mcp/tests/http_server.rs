mod common;

use std::sync::Arc;

use cmdbridge_mcp::McpHttpServer;
use cmdbridge_types::TransportMode;

#[tokio::test]
async fn starts_on_ephemeral_port_and_stops() {
    let adapter = Arc::new(common::adapter(TransportMode::Http, Vec::new()));
    let server = McpHttpServer::new("127.0.0.1:0".parse().unwrap(), "/mcp", adapter);
    let running = server.start().await.expect("server starts");

    let address = running.bound_address();
    assert!(address.ip().is_loopback());
    assert_ne!(address.port(), 0);
    assert_eq!(running.url(), format!("http://{address}/mcp"));
    assert_eq!(running.connected_clients(), 0);

    let connection = tokio::net::TcpStream::connect(address).await;
    assert!(connection.is_ok(), "listener should accept connections");
    drop(connection);

    running.stop().await.expect("server stops");
}
