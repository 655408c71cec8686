use crate::commands::util::{format_event_line, print_hints, print_json, report_result};
use crate::commands::{CommandContext, CommandResult};
use calendesk::error::{config_error, rejected};
use calendesk::session::AuthTracker;
use calendesk::utils::time::{parse_event_time, tomorrow_at};
use calendesk::views::event_form::{EventDraft, EventFormView};
use calendesk::views::event_list::{EventListView, TimeFilter};
use calendesk::views::test_events::TestEventView;
use chrono::Utc;
use clap::Args;

/// Arguments for `events create`
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// Start time, RFC 3339 or `YYYY-MM-DD HH:MM`; defaults to tomorrow 09:00 UTC
    #[arg(long)]
    pub start: Option<String>,
    /// Length in minutes; defaults to the event type's duration or 60
    #[arg(long)]
    pub duration: Option<u32>,
    /// Comma separated attendee emails; defaults to the logged in user
    #[arg(long)]
    pub attendees: Option<String>,
    #[arg(long)]
    pub max_attendees: Option<u32>,
    /// Create a scheduling link for this event type instead of a custom event
    #[arg(long)]
    pub event_type: Option<String>,
    #[arg(long, default_value = "UTC")]
    pub timezone: String,
    /// Send through the test event endpoint
    #[arg(long)]
    pub test: bool,
}

/// List events with the time filter and search applied
pub async fn list(ctx: &CommandContext, filter: TimeFilter, search: String) -> CommandResult {
    let mut view = EventListView::new(ctx.client.clone());
    view.set_filter(filter);
    view.set_search(search);

    view.load().await;
    if let Some(message) = view.state().error() {
        print_hints(message);
        return Err(rejected(message));
    }

    let now = Utc::now();
    let visible = view.visible_at(now);
    for event in &visible {
        println!("{}", format_event_line(event));
    }
    println!(
        "Showing {} of {} events ({} upcoming, {} past)",
        visible.len(),
        view.events().len(),
        view.upcoming_count(now),
        view.past_count(now)
    );
    Ok(())
}

/// Create a custom event, a scheduling link, or a test event
pub async fn create(ctx: &CommandContext, args: CreateArgs) -> CommandResult {
    let tracker = AuthTracker::new(ctx.client.clone());
    let mut form = EventFormView::new(ctx.client.clone());
    form.load(&tracker).await;

    match &args.event_type {
        Some(uri) => {
            if !form.select_event_type(uri) {
                return Err(config_error(&format!("Unknown event type: {}", uri)));
            }
        }
        None => form.set_custom(true),
    }

    let start = match &args.start {
        Some(value) => parse_event_time(value)
            .ok_or_else(|| config_error(&format!("Could not parse start time: {}", value)))?,
        None => tomorrow_at(Utc::now(), 9)
            .ok_or_else(|| config_error("Could not compute a default start time"))?,
    };

    let draft = EventDraft {
        title: args.title,
        description: args.description,
        location: args.location,
        start,
        duration_minutes: args
            .duration
            .or_else(|| form.suggested_duration())
            .unwrap_or(60),
        attendees: args.attendees.unwrap_or_else(|| form.default_attendees()),
        max_attendees: args.max_attendees,
        timezone: args.timezone,
    };

    if args.test {
        let mut view = TestEventView::new(ctx.client.clone());
        view.create_from_draft(&draft, |created| {
            if let Some(data) = created {
                print_json(data);
            }
        })
        .await;
        return state_error(view.state().error());
    }

    form.submit(&draft, print_json).await;
    state_error(form.state().error())
}

/// Delete one event
pub async fn delete(ctx: &CommandContext, uri: &str) -> CommandResult {
    let mut view = EventListView::new(ctx.client.clone());
    view.delete(uri).await?;
    println!("Deleted {}", uri);
    Ok(())
}

/// Create a one hour test event starting this time tomorrow
pub async fn quick_test(ctx: &CommandContext) -> CommandResult {
    let tracker = AuthTracker::new(ctx.client.clone());
    let mut view = TestEventView::new(ctx.client.clone());
    view.load_user(&tracker).await;

    view.create_quick(Utc::now(), |created| {
        println!("Test event created");
        if let Some(data) = created {
            print_json(data);
        }
    })
    .await;
    state_error(view.state().error())
}

/// Remove every test event
pub async fn clear_test(ctx: &CommandContext) -> CommandResult {
    let mut view = TestEventView::new(ctx.client.clone());
    view.clear_test_events(|| println!("Test events removed"))
        .await;
    state_error(view.state().error())
}

/// List the event types offered for scheduling links
pub async fn event_types(ctx: &CommandContext) -> CommandResult {
    report_result(ctx.client.calendly().event_types().await)
}

fn state_error(error: Option<&str>) -> CommandResult {
    match error {
        Some(message) => {
            print_hints(message);
            Err(rejected(message))
        }
        None => Ok(()),
    }
}
