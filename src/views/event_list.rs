use super::ViewState;
use crate::api::models::{collection, Event};
use crate::api::ApiClient;
use crate::error::ClientResult;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Which part of the timeline to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    All,
    Upcoming,
    Past,
}

impl std::str::FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TimeFilter::All),
            "upcoming" => Ok(TimeFilter::Upcoming),
            "past" => Ok(TimeFilter::Past),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}

/// Whether `event` passes the time filter. Events without a parseable start
/// only show up under [`TimeFilter::All`].
fn matches_time(event: &Event, filter: TimeFilter, now: DateTime<Utc>) -> bool {
    match filter {
        TimeFilter::All => true,
        TimeFilter::Upcoming => event.is_upcoming(now) == Some(true),
        TimeFilter::Past => event.is_upcoming(now) == Some(false),
    }
}

/// Case-insensitive substring match over name, description and location.
/// An event with none of those fields never matches, not even an empty term.
fn matches_search(event: &Event, term: &str) -> bool {
    let term = term.to_lowercase();

    [
        event.name.as_deref(),
        event.description.as_deref(),
        event.location_text(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}

/// Apply the time filter and search term to already fetched events
pub fn filter_events<'a>(
    events: &'a [Event],
    filter: TimeFilter,
    search: &str,
    now: DateTime<Utc>,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| matches_time(event, filter, now) && matches_search(event, search))
        .collect()
}

/// List of scheduled events with local filtering and deletion
#[derive(Debug)]
pub struct EventListView {
    client: ApiClient,
    events: ViewState<Vec<Event>>,
    deletion: ViewState<String>,
    filter: TimeFilter,
    search: String,
}

impl EventListView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            events: ViewState::new(),
            deletion: ViewState::new(),
            filter: TimeFilter::All,
            search: String::new(),
        }
    }

    pub fn state(&self) -> &ViewState<Vec<Event>> {
        &self.events
    }

    pub fn deletion(&self) -> &ViewState<String> {
        &self.deletion
    }

    /// Events from the last successful load
    pub fn events(&self) -> &[Event] {
        self.events.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Fetch the event list; the list is `data.collection` of the response
    pub async fn load(&mut self) -> bool {
        let client = &self.client;
        let ran = self
            .events
            .run(|| async move {
                let response = client.calendly().events().await?;
                let events: Vec<Event> = collection(&response);
                ClientResult::Ok(events)
            })
            .await;

        if let Some(message) = self.events.error() {
            error!("Error loading events: {}", message);
        } else if ran {
            info!("Loaded {} events", self.events().len());
        }
        ran
    }

    pub async fn refresh(&mut self) -> bool {
        self.load().await
    }

    /// Delete an event on the backend and drop it from the local list
    pub async fn delete(&mut self, uri: &str) -> ClientResult<()> {
        if !self.deletion.trigger() {
            return Ok(());
        }

        match self.client.calendly().delete_event(uri).await {
            Ok(_) => {
                if let Some(events) = self.events.data_mut() {
                    events.retain(|event| event.uri != uri);
                }
                self.deletion.resolve(uri.to_string());
                Ok(())
            }
            Err(e) => {
                error!("Error deleting event {}: {}", uri, e);
                self.deletion.reject(e.to_string());
                Err(e)
            }
        }
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TimeFilter) {
        self.filter = filter;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Events matching the current filter and search, as of `now`
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<&Event> {
        filter_events(self.events(), self.filter, &self.search, now)
    }

    pub fn visible(&self) -> Vec<&Event> {
        self.visible_at(Utc::now())
    }

    pub fn upcoming_count(&self, now: DateTime<Utc>) -> usize {
        filter_events(self.events(), TimeFilter::Upcoming, "", now).len()
    }

    pub fn past_count(&self, now: DateTime<Utc>) -> usize {
        filter_events(self.events(), TimeFilter::Past, "", now).len()
    }
}
