use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::time::parse_event_time;
use tracing::warn;

/// The client's belief about who is logged in, as reported by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Session {
    /// Session used whenever the status check fails
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Profile of the logged in user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(rename = "googleId", default)]
    pub google_id: Option<String>,
}

/// Result of a logout attempt. Logout never fails, it reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoutResult {
    pub success: bool,
    pub message: String,
}

/// Person who booked an event
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Invitee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A scheduled event, either from the scheduling provider or a custom entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawEvent")]
pub struct Event {
    pub uri: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: Option<String>,
    pub status: Option<String>,
    /// Either a plain string or a provider location object
    pub location: Option<Value>,
    pub invitee: Option<Invitee>,
    pub attendees: Vec<String>,
    pub is_custom_event: bool,
}

/// Wire form of [`Event`]. Provider events and custom entries name their
/// identifier and title differently, and either may send `null` anywhere.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEvent {
    uri: Option<String>,
    id: Option<Value>,
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    created_at: Option<String>,
    status: Option<String>,
    location: Option<Value>,
    invitee: Option<Invitee>,
    attendees: Option<Vec<Value>>,
    is_custom_event: Option<bool>,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let uri = raw
            .uri
            .or_else(|| match raw.id {
                Some(Value::String(id)) => Some(id),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            })
            .unwrap_or_default();

        // Attendees arrive as bare emails or as `{ "email": .. }` objects
        let attendees = raw
            .attendees
            .unwrap_or_default()
            .into_iter()
            .filter_map(|attendee| match attendee {
                Value::String(email) => Some(email),
                Value::Object(map) => map.get("email").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect();

        Self {
            uri,
            name: raw.name.or(raw.title),
            description: raw.description,
            start_time: raw.start_time,
            end_time: raw.end_time,
            created_at: raw.created_at,
            status: raw.status,
            location: raw.location,
            invitee: raw.invitee,
            attendees,
            is_custom_event: raw.is_custom_event.unwrap_or_default(),
        }
    }
}

impl Event {
    /// Human readable location, if any
    pub fn location_text(&self) -> Option<&str> {
        match self.location.as_ref()? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map
                .get("location")
                .or_else(|| map.get("join_url"))
                .and_then(Value::as_str),
            _ => None,
        }
    }

    /// Parsed start time; `None` when missing or unparseable
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_event_time)
    }

    /// Whether the event starts strictly after `now`
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> Option<bool> {
        self.start().map(|start| start > now)
    }
}

/// Reusable event template offered by the scheduling provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventType {
    pub uri: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "duration")]
    pub duration_minutes: Option<u32>,
    pub active: bool,
    pub slug: Option<String>,
    pub price: Option<Value>,
}

/// Payload for creating a custom event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub attendees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_uri: Option<String>,
    pub is_custom_event: bool,
    pub duration: u32,
    pub max_attendees: u32,
    pub timezone: String,
}

/// Payload for the provider's own event creation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEvent {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub invitee: Invitee,
}

/// Payload for a single-use scheduling link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingLinkRequest {
    pub event_type_uri: String,
    pub max_event_count: u32,
}

/// Pull `data.collection` out of a backend envelope, empty when absent.
/// Items that do not fit `T` are logged and skipped.
pub fn collection<T: DeserializeOwned>(response: &Value) -> Vec<T> {
    let items = match response.pointer("/data/collection") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            warn!("Expected a collection array, got: {}", other);
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping collection item {}: {}", index, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_session_tolerates_partial_user() {
        let session: Session = serde_json::from_value(json!({
            "authenticated": true,
            "user": { "email": "a@b.com", "name": "A" }
        }))
        .unwrap();

        assert!(session.authenticated);
        let user = session.user.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert!(user.picture.is_none());
        assert!(user.google_id.is_none());
    }

    #[test]
    fn test_session_missing_fields_is_anonymous() {
        let session: Session = serde_json::from_value(json!({})).unwrap();
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_event_accepts_id_and_title_aliases() {
        let event: Event = serde_json::from_value(json!({
            "id": "local-1",
            "title": "Standup",
            "start_time": "2030-01-01T10:00:00Z",
            "location": { "type": "zoom", "join_url": "https://zoom.example/j/1" },
            "attendees": ["x@y.com"],
            "is_custom_event": true
        }))
        .unwrap();

        assert_eq!(event.uri, "local-1");
        assert_eq!(event.name.as_deref(), Some("Standup"));
        assert_eq!(event.location_text(), Some("https://zoom.example/j/1"));
        assert!(event.is_custom_event);

        let now = Utc.with_ymd_and_hms(2029, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(event.is_upcoming(now), Some(true));
    }

    #[test]
    fn test_event_with_bad_start_time_is_unclassified() {
        let event = Event {
            start_time: Some("yesterday-ish".to_string()),
            ..Default::default()
        };
        assert_eq!(event.is_upcoming(Utc::now()), None);
    }

    #[test]
    fn test_new_event_wire_names() {
        let payload = NewEvent {
            title: "T".into(),
            description: String::new(),
            location: String::new(),
            start_date: "s".into(),
            end_date: "e".into(),
            attendees: vec![],
            event_type_uri: None,
            is_custom_event: true,
            duration: 30,
            max_attendees: 1,
            timezone: "UTC".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["startDate"], "s");
        assert_eq!(value["isCustomEvent"], true);
        assert_eq!(value["maxAttendees"], 1);
        assert!(value.get("eventTypeUri").is_none());
    }

    #[test]
    fn test_collection_extraction() {
        let response = json!({ "data": { "collection": [{ "uri": "u1" }, { "uri": "u2" }] } });
        let events: Vec<Event> = collection(&response);
        assert_eq!(events.len(), 2);

        let empty: Vec<Event> = collection(&json!({ "data": null }));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_event_prefers_uri_and_name_when_both_spellings_sent() {
        let event: Event = serde_json::from_value(json!({
            "uri": "https://api.calendly.com/scheduled_events/E1",
            "id": "E1",
            "name": "Provider name",
            "title": "Custom title",
        }))
        .unwrap();

        assert_eq!(event.uri, "https://api.calendly.com/scheduled_events/E1");
        assert_eq!(event.name.as_deref(), Some("Provider name"));
    }

    #[test]
    fn test_event_tolerates_nulls_and_numeric_id() {
        let event: Event = serde_json::from_value(json!({
            "id": 42,
            "title": "Local",
            "attendees": null,
            "is_custom_event": null,
            "invitee": null,
            "location": null,
        }))
        .unwrap();

        assert_eq!(event.uri, "42");
        assert!(event.attendees.is_empty());
        assert!(!event.is_custom_event);
        assert!(event.location_text().is_none());
    }

    #[test]
    fn test_event_attendee_objects() {
        let event: Event = serde_json::from_value(json!({
            "uri": "u",
            "attendees": ["a@b.com", { "email": "c@d.com", "name": "C" }, 7],
        }))
        .unwrap();
        assert_eq!(event.attendees, vec!["a@b.com", "c@d.com"]);
    }

    #[test]
    fn test_collection_keeps_irregular_events_and_skips_broken_ones() {
        let response = json!({ "data": { "collection": [
            { "uri": "ok" },
            { "uri": "both", "id": "dup" },
            { "name": "named", "title": "titled", "uri": "titles" },
            { "uri": "nulls", "attendees": null, "is_custom_event": null },
            { "uri": 17, "name": ["not", "a", "string"] },
            "not an object",
        ] } });

        let events: Vec<Event> = collection(&response);
        let uris: Vec<&str> = events.iter().map(|e| e.uri.as_str()).collect();
        assert_eq!(uris, vec!["ok", "both", "titles", "nulls"]);

        let not_a_list: Vec<Event> = collection(&json!({ "data": { "collection": {} } }));
        assert!(not_a_list.is_empty());
    }
}
