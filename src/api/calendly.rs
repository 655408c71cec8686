use super::models::{NewEvent, SampleEvent, SchedulingLinkRequest};
use super::{ApiClient, RequestOptions};
use crate::error::{other_error, ClientResult};
use serde_json::Value;
use url::{form_urlencoded, Url};

pub const CONNECT_PATH: &str = "/calendly/connect";

/// Encode key/value pairs as a query string, without the leading `?`
pub fn query_string<'p, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'p str, &'p str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Append a query string to a path, leaving the path alone when there is none
fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Percent-encode a value for use as a single path segment
fn path_segment(value: &str) -> ClientResult<String> {
    let mut scratch = Url::parse("http://localhost/")?;
    scratch
        .path_segments_mut()
        .map_err(|_| other_error("URL cannot carry path segments"))?
        .clear()
        .push(value);
    Ok(scratch.path().trim_start_matches('/').to_string())
}

/// Scheduling endpoints proxied by the backend
#[derive(Debug, Clone, Copy)]
pub struct CalendlyApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CalendlyApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Backend root, used as a connectivity probe
    pub async fn root(self) -> ClientResult<Value> {
        self.client.request("/", RequestOptions::get()).await
    }

    pub async fn events(self) -> ClientResult<Value> {
        self.client.request("/calendly/events", RequestOptions::get()).await
    }

    pub async fn create_event(self, event: &SampleEvent) -> ClientResult<Value> {
        self.client
            .request("/calendly/events", RequestOptions::post(serde_json::to_value(event)?))
            .await
    }

    /// Create an event from an arbitrary payload, as the quick test creator does
    pub async fn create_event_raw(self, payload: Value) -> ClientResult<Value> {
        self.client
            .request("/calendly/events", RequestOptions::post(payload))
            .await
    }

    pub async fn delete_event(self, uri: &str) -> ClientResult<Value> {
        let path = format!("/calendly/events/{}", path_segment(uri)?);
        self.client.request(&path, RequestOptions::delete()).await
    }

    pub async fn create_custom_event(self, event: &NewEvent) -> ClientResult<Value> {
        self.client
            .request(
                "/calendly/custom-events",
                RequestOptions::post(serde_json::to_value(event)?),
            )
            .await
    }

    pub async fn clear_test_events(self) -> ClientResult<Value> {
        self.client
            .request("/calendly/test-events", RequestOptions::delete())
            .await
    }

    pub async fn stats(self) -> ClientResult<Value> {
        self.client.request("/calendly/stats", RequestOptions::get()).await
    }

    pub async fn event_types(self) -> ClientResult<Value> {
        self.client
            .request("/calendly/event-types", RequestOptions::get())
            .await
    }

    pub async fn scheduled_events(self, params: &[(&str, &str)]) -> ClientResult<Value> {
        let path = with_query(
            "/calendly/scheduled-events",
            &query_string(params.iter().copied()),
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn upcoming_events(self, days: u32) -> ClientResult<Value> {
        let path = format!("/calendly/upcoming-events?days={}", days);
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn user_info(self) -> ClientResult<Value> {
        self.client
            .request("/calendly/user-info", RequestOptions::get())
            .await
    }

    pub async fn create_scheduling_link(
        self,
        event_type_uri: &str,
        max_event_count: u32,
    ) -> ClientResult<Value> {
        let body = SchedulingLinkRequest {
            event_type_uri: event_type_uri.to_string(),
            max_event_count,
        };
        self.client
            .request(
                "/calendly/scheduling-links",
                RequestOptions::post(serde_json::to_value(body)?),
            )
            .await
    }

    pub async fn invitee_details(self, invitee_uri: &str) -> ClientResult<Value> {
        let path = with_query(
            "/calendly/invitee-details",
            &query_string([("invitee_uri", invitee_uri)]),
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn event_analytics(
        self,
        event_type_uri: &str,
        start_date: &str,
        end_date: &str,
    ) -> ClientResult<Value> {
        let query = query_string([
            ("event_type_uri", event_type_uri),
            ("start_date", start_date),
            ("end_date", end_date),
        ]);
        let path = with_query("/calendly/event-analytics", &query);
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn connect(self) -> ClientResult<Value> {
        self.client.request(CONNECT_PATH, RequestOptions::get()).await
    }

    pub async fn callback(self, code: &str) -> ClientResult<Value> {
        let path = with_query("/calendly/callback", &query_string([("code", code)]));
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn test_auth(self) -> ClientResult<Value> {
        self.client
            .request("/calendly/test-auth", RequestOptions::get())
            .await
    }

    pub async fn config_status(self) -> ClientResult<Value> {
        self.client
            .request("/calendly/config-status", RequestOptions::get())
            .await
    }
}
