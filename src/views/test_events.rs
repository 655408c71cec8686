use super::event_form::EventDraft;
use super::ViewState;
use crate::api::ApiClient;
use crate::session::AuthTracker;
use crate::utils::time::{end_time, to_iso, tomorrow};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{error, info};

/// Fallback attendee added to every quick test event
pub const TEST_ATTENDEE: &str = "test@example.com";

/// Creates and clears throwaway events for exercising the backend
#[derive(Debug)]
pub struct TestEventView {
    client: ApiClient,
    user_email: Option<String>,
    state: ViewState<Value>,
}

impl TestEventView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            user_email: None,
            state: ViewState::new(),
        }
    }

    pub async fn load_user(&mut self, tracker: &AuthTracker) {
        let session = tracker.check_status().await;
        self.user_email = session
            .user
            .filter(|_| session.authenticated)
            .map(|user| user.email)
            .filter(|email| !email.is_empty());
    }

    pub fn state(&self) -> &ViewState<Value> {
        &self.state
    }

    /// Attendees for a quick event: the user plus a test address
    pub fn quick_attendees(&self) -> Vec<String> {
        match &self.user_email {
            Some(email) => vec![email.clone(), TEST_ATTENDEE.to_string()],
            None => vec![TEST_ATTENDEE.to_string(), "user@test.com".to_string()],
        }
    }

    /// Payload for a one hour event starting this time tomorrow
    pub fn quick_payload(&self, now: DateTime<Utc>) -> Value {
        let start = tomorrow(now);
        json!({
            "title": format!("Test Event {}", now.format("%Y-%m-%d %H:%M:%S")),
            "description": "Automatically created test event",
            "startDate": to_iso(start),
            "endDate": to_iso(end_time(start, 60)),
            "location": "Virtual Office",
            "attendees": self.quick_attendees(),
            "maxAttendees": 5,
        })
    }

    /// Payload built from a user supplied draft
    pub fn draft_payload(draft: &EventDraft) -> Value {
        json!({
            "title": draft.title,
            "description": draft.description,
            "startDate": to_iso(draft.start),
            "endDate": to_iso(draft.end()),
            "location": draft.location,
            "attendees": draft.attendee_list(),
            "maxAttendees": draft.max_attendees.unwrap_or(5),
        })
    }

    async fn create<F>(&mut self, payload: Value, on_created: F) -> bool
    where
        F: FnOnce(Option<&Value>),
    {
        let client = &self.client;
        let ran = self
            .state
            .run(|| client.calendly().create_event_raw(payload))
            .await;

        match (self.state.data(), self.state.error()) {
            (Some(response), _) => {
                info!("Test event created");
                on_created(response.get("data"));
            }
            (_, Some(message)) => error!("Error creating test event: {}", message),
            _ => {}
        }
        ran
    }

    pub async fn create_quick<F>(&mut self, now: DateTime<Utc>, on_created: F) -> bool
    where
        F: FnOnce(Option<&Value>),
    {
        let payload = self.quick_payload(now);
        self.create(payload, on_created).await
    }

    pub async fn create_from_draft<F>(&mut self, draft: &EventDraft, on_created: F) -> bool
    where
        F: FnOnce(Option<&Value>),
    {
        self.create(Self::draft_payload(draft), on_created).await
    }

    /// Remove all test events; `on_refresh` runs after a successful clear
    pub async fn clear_test_events<F>(&mut self, on_refresh: F) -> bool
    where
        F: FnOnce(),
    {
        let client = &self.client;
        let ran = self
            .state
            .run(|| client.calendly().clear_test_events())
            .await;

        if self.state.data().is_some() {
            info!("Test events removed");
            on_refresh();
        } else if let Some(message) = self.state.error() {
            error!("Error removing test events: {}", message);
        }
        ran
    }
}
