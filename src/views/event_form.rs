use super::ViewState;
use crate::api::models::{collection, EventType, NewEvent};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::AuthTracker;
use crate::utils::time::{end_time, to_iso};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// Values entered into the event form
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Comma separated email addresses
    pub attendees: String,
    pub max_attendees: Option<u32>,
    pub timezone: String,
}

impl EventDraft {
    pub fn end(&self) -> DateTime<Utc> {
        end_time(self.start, self.duration_minutes)
    }

    /// Attendee emails, trimmed, empty entries dropped
    pub fn attendee_list(&self) -> Vec<String> {
        self.attendees
            .split(',')
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn max_attendees(&self) -> u32 {
        self.max_attendees.unwrap_or(1)
    }

    /// Payload for the custom event endpoint
    pub fn to_new_event(&self, event_type_uri: Option<String>, is_custom_event: bool) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start_date: to_iso(self.start),
            end_date: to_iso(self.end()),
            attendees: self.attendee_list(),
            event_type_uri,
            is_custom_event,
            duration: self.duration_minutes,
            max_attendees: self.max_attendees(),
            timezone: self.timezone.clone(),
        }
    }
}

/// Event creation form: either a custom event or a scheduling link for a
/// provider event type
#[derive(Debug)]
pub struct EventFormView {
    client: ApiClient,
    event_types: Vec<EventType>,
    selected: Option<EventType>,
    custom: bool,
    user_email: Option<String>,
    submission: ViewState<Value>,
}

impl EventFormView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            event_types: Vec::new(),
            selected: None,
            custom: false,
            user_email: None,
            submission: ViewState::new(),
        }
    }

    /// Load the event type catalog and the current user's email. Failures
    /// leave the catalog empty and the email unset.
    pub async fn load(&mut self, tracker: &AuthTracker) {
        match self.load_event_types().await {
            Ok(types) => {
                debug!("Loaded {} event types", types.len());
                self.event_types = types;
            }
            Err(e) => error!("Error loading event types: {}", e),
        }

        let session = tracker.check_status().await;
        if session.authenticated {
            self.user_email = session
                .user
                .map(|user| user.email)
                .filter(|email| !email.is_empty());
        }
    }

    async fn load_event_types(&self) -> ClientResult<Vec<EventType>> {
        let response = self.client.calendly().event_types().await?;
        Ok(collection(&response))
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// Attendees field prefill
    pub fn default_attendees(&self) -> String {
        self.user_email.clone().unwrap_or_default()
    }

    /// Select an event type by URI. Returns whether it was found.
    pub fn select_event_type(&mut self, uri: &str) -> bool {
        self.selected = self.event_types.iter().find(|t| t.uri == uri).cloned();
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&EventType> {
        self.selected.as_ref()
    }

    pub fn set_custom(&mut self, custom: bool) {
        self.custom = custom;
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Suggested duration for the selected type
    pub fn suggested_duration(&self) -> Option<u32> {
        self.selected.as_ref().and_then(|t| t.duration_minutes)
    }

    pub fn state(&self) -> &ViewState<Value> {
        &self.submission
    }

    /// Submit the form. `on_created` receives the created resource.
    pub async fn submit<F>(&mut self, draft: &EventDraft, on_created: F) -> bool
    where
        F: FnOnce(&Value),
    {
        let client = &self.client;
        let selected = if self.custom { None } else { self.selected.clone() };
        let custom = self.custom;

        let ran = self
            .submission
            .run(|| async move {
                match selected {
                    None => {
                        let payload = draft.to_new_event(None, custom);
                        let response = client.calendly().create_custom_event(&payload).await?;
                        info!("Custom event created");
                        ClientResult::Ok(response.get("data").cloned().unwrap_or(Value::Null))
                    }
                    Some(event_type) => {
                        let response = client
                            .calendly()
                            .create_scheduling_link(&event_type.uri, draft.max_attendees())
                            .await?;
                        info!("Scheduling link created for {}", event_type.uri);
                        let payload = draft.to_new_event(Some(event_type.uri.clone()), false);
                        link_created(response, &event_type, &payload)
                    }
                }
            })
            .await;

        if let Some(data) = self.submission.data() {
            on_created(data);
        } else if let Some(message) = self.submission.error() {
            error!("Error creating event: {}", message);
        }
        ran
    }

    /// Back to an empty form
    pub fn reset(&mut self) {
        self.selected = None;
        self.custom = false;
        self.submission.clear();
    }
}

/// Combine the scheduling link response with what the user asked for
fn link_created(response: Value, event_type: &EventType, payload: &NewEvent) -> ClientResult<Value> {
    let mut data = match response.get("data") {
        Some(Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    };
    data.insert("eventType".to_string(), serde_json::to_value(event_type)?);
    data.insert("customData".to_string(), serde_json::to_value(payload)?);
    Ok(json!(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> EventDraft {
        EventDraft {
            title: "Planning".to_string(),
            description: "Sprint planning".to_string(),
            location: "Room 4".to_string(),
            start: Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap(),
            duration_minutes: 90,
            attendees: " a@b.com, ,c@d.com ".to_string(),
            max_attendees: None,
            timezone: "UTC".to_string(),
        }
    }

    #[test]
    fn test_draft_end_and_attendees() {
        let draft = draft();
        assert_eq!(to_iso(draft.end()), "2024-09-02T10:30:00.000Z");
        assert_eq!(draft.attendee_list(), vec!["a@b.com", "c@d.com"]);
        assert_eq!(draft.max_attendees(), 1);
    }

    #[test]
    fn test_new_event_payload() {
        let payload = draft().to_new_event(None, true);
        assert_eq!(payload.start_date, "2024-09-02T09:00:00.000Z");
        assert_eq!(payload.end_date, "2024-09-02T10:30:00.000Z");
        assert_eq!(payload.duration, 90);
        assert!(payload.is_custom_event);
    }

    #[test]
    fn test_link_created_merges_request() {
        let event_type = EventType {
            uri: "https://api.calendly.com/event_types/1".to_string(),
            ..Default::default()
        };
        let payload = draft().to_new_event(Some(event_type.uri.clone()), false);
        let response = json!({ "data": { "booking_url": "https://calendly.com/d/abc" } });

        let data = link_created(response, &event_type, &payload).unwrap();
        assert_eq!(data["booking_url"], "https://calendly.com/d/abc");
        assert_eq!(data["eventType"]["uri"], event_type.uri);
        assert_eq!(data["customData"]["title"], "Planning");
    }

    #[test]
    fn test_select_unknown_event_type() {
        let mut view = EventFormView::new(ApiClient::new("http://localhost:3000").unwrap());
        assert!(!view.select_event_type("nope"));
        assert!(view.selected().is_none());
        assert!(view.suggested_duration().is_none());
    }
}
