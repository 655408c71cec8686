use super::ViewState;
use crate::api::ApiClient;
use crate::error::{rejected, ClientResult};
use serde_json::Value;

/// Configuration status of the scheduling integration, as the backend sees it
#[derive(Debug)]
pub struct ConfigStatusView {
    client: ApiClient,
    state: ViewState<Value>,
}

impl ConfigStatusView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState<Value> {
        &self.state
    }

    /// Load the status; a response without `data` is an error
    pub async fn load(&mut self) -> bool {
        let client = &self.client;
        self.state
            .run(|| async move {
                let response = client.calendly().config_status().await?;
                match response.get("data") {
                    Some(data) if !data.is_null() => ClientResult::Ok(data.clone()),
                    _ => Err(rejected("Could not get the configuration status")),
                }
            })
            .await
    }

    /// One section of the status (`calendly`, `user`, `test_events`)
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.state.data().and_then(|data| data.get(name))
    }
}
