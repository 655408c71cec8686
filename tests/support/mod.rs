#![allow(dead_code)]

use calendesk::api::ApiClient;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Some sandboxes refuse loopback listeners; tests that need a mock server
/// skip themselves there.
pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).unwrap()
}

/// Client pointed at a port nothing listens on
pub fn unreachable_client() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9").unwrap()
}

/// Event list response in the backend's `data.collection` shape
pub fn events_page(events: Vec<Value>) -> Value {
    json!({ "data": { "collection": events } })
}

pub fn event(uri: &str, name: &str, start: &str) -> Value {
    json!({
        "uri": uri,
        "name": name,
        "start_time": start,
        "status": "active",
    })
}

pub fn authenticated(email: &str) -> Value {
    json!({
        "authenticated": true,
        "user": { "email": email, "name": "Test User" },
    })
}
