use super::{remediation_hints, ViewState};
use crate::api::models::{Invitee, SampleEvent};
use crate::api::ApiClient;
use crate::utils::time::{end_time, to_iso, tomorrow};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Scheduling API console: one panel, one request state, several probes
#[derive(Debug)]
pub struct CalendlyConsoleView {
    client: ApiClient,
    state: ViewState<Value>,
}

impl CalendlyConsoleView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState<Value> {
        &self.state
    }

    pub fn hints(&self) -> Vec<&'static str> {
        self.state.error().map(remediation_hints).unwrap_or_default()
    }

    pub async fn test_auth(&mut self) -> bool {
        let client = &self.client;
        self.state.run(|| client.calendly().test_auth()).await
    }

    pub async fn events(&mut self) -> bool {
        let client = &self.client;
        self.state.run(|| client.calendly().events()).await
    }

    pub async fn stats(&mut self) -> bool {
        let client = &self.client;
        self.state.run(|| client.calendly().stats()).await
    }

    pub async fn event_types(&mut self) -> bool {
        let client = &self.client;
        self.state.run(|| client.calendly().event_types()).await
    }

    /// One hour sample event tomorrow with a fixed invitee
    pub fn sample_event(now: DateTime<Utc>) -> SampleEvent {
        let start = tomorrow(now);
        SampleEvent {
            title: "Test Event".to_string(),
            description: "Sample event created from the terminal client".to_string(),
            start_time: to_iso(start),
            end_time: to_iso(end_time(start, 60)),
            invitee: Invitee {
                name: Some("Test User".to_string()),
                email: Some("test@example.com".to_string()),
            },
        }
    }

    pub async fn create_sample(&mut self, now: DateTime<Utc>) -> bool {
        let client = &self.client;
        let event = Self::sample_event(now);
        self.state
            .run(|| async move { client.calendly().create_event(&event).await })
            .await
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }
}
