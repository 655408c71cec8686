use super::{remediation_hints, ViewState};
use crate::api::ApiClient;
use crate::error::{rejected, ClientResult};
use crate::session::AuthTracker;
use serde_json::{json, Value};

/// Backend health panel. All probes share one request state.
#[derive(Debug)]
pub struct DiagnosticsView {
    tracker: AuthTracker,
    state: ViewState<Value>,
}

impl DiagnosticsView {
    pub fn new(tracker: AuthTracker) -> Self {
        Self {
            tracker,
            state: ViewState::new(),
        }
    }

    fn client(&self) -> &ApiClient {
        self.tracker.client()
    }

    pub fn state(&self) -> &ViewState<Value> {
        &self.state
    }

    /// Hints for the current error, if any
    pub fn hints(&self) -> Vec<&'static str> {
        self.state.error().map(remediation_hints).unwrap_or_default()
    }

    /// Probe the backend root
    pub async fn ping(&mut self) -> bool {
        let client = self.tracker.client();
        self.state.run(|| client.calendly().root()).await
    }

    /// Call the provider login endpoint directly
    pub async fn test_auth(&mut self) -> bool {
        let client = self.tracker.client();
        self.state.run(|| client.auth().google()).await
    }

    /// Call the events endpoint, which needs a working session
    pub async fn test_events(&mut self) -> bool {
        let client = self.tracker.client();
        self.state.run(|| client.calendly().events()).await
    }

    /// Log out; a failed logout lands in the error state
    pub async fn logout(&mut self) -> bool {
        let tracker = &self.tracker;
        self.state
            .run(|| async move {
                let result = tracker.logout().await;
                if result.success {
                    ClientResult::Ok(json!(result))
                } else {
                    Err(rejected(&result.message))
                }
            })
            .await
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    pub fn backend_url(&self) -> &str {
        self.client().base_url()
    }
}
