use crate::commands::util::{print_json, report, report_result};
use crate::commands::{CommandContext, CommandResult};
use calendesk::api::CONNECT_PATH;
use calendesk::views::console::CalendlyConsoleView;
use calendesk::views::status::ConfigStatusView;
use chrono::Utc;
use tracing::warn;

pub async fn stats(ctx: &CommandContext) -> CommandResult {
    let mut console = CalendlyConsoleView::new(ctx.client.clone());
    console.stats().await;
    report(console.state())
}

pub async fn scheduled(ctx: &CommandContext, params: &[(String, String)]) -> CommandResult {
    let params: Vec<(&str, &str)> = params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    report_result(ctx.client.calendly().scheduled_events(&params).await)
}

pub async fn upcoming(ctx: &CommandContext, days: u32) -> CommandResult {
    report_result(ctx.client.calendly().upcoming_events(days).await)
}

pub async fn user_info(ctx: &CommandContext) -> CommandResult {
    report_result(ctx.client.calendly().user_info().await)
}

pub async fn link(ctx: &CommandContext, event_type: &str, max_events: u32) -> CommandResult {
    report_result(
        ctx.client
            .calendly()
            .create_scheduling_link(event_type, max_events)
            .await,
    )
}

pub async fn invitee(ctx: &CommandContext, uri: &str) -> CommandResult {
    report_result(ctx.client.calendly().invitee_details(uri).await)
}

pub async fn analytics(
    ctx: &CommandContext,
    event_type: &str,
    start_date: &str,
    end_date: &str,
) -> CommandResult {
    report_result(
        ctx.client
            .calendly()
            .event_analytics(event_type, start_date, end_date)
            .await,
    )
}

/// Create the fixed sample event
pub async fn sample(ctx: &CommandContext) -> CommandResult {
    let mut console = CalendlyConsoleView::new(ctx.client.clone());
    console.create_sample(Utc::now()).await;
    report(console.state())
}

/// Send the user to the account connection page
pub async fn connect(ctx: &CommandContext, open_browser: bool) -> CommandResult {
    let url = ctx.client.url(CONNECT_PATH)?;
    println!("Connect the scheduling account at:\n  {}", url);

    if open_browser {
        if let Err(e) = webbrowser::open(url.as_str()) {
            warn!("Could not open a browser: {}", e);
        }
    }
    Ok(())
}

pub async fn callback(ctx: &CommandContext, code: &str) -> CommandResult {
    report_result(ctx.client.calendly().callback(code).await)
}

pub async fn test_auth(ctx: &CommandContext) -> CommandResult {
    let mut console = CalendlyConsoleView::new(ctx.client.clone());
    console.test_auth().await;
    report(console.state())
}

/// Print the integration status section by section
pub async fn config_status(ctx: &CommandContext) -> CommandResult {
    let mut view = ConfigStatusView::new(ctx.client.clone());
    view.load().await;
    if view.state().error().is_some() {
        return report(view.state());
    }

    for name in ["calendly", "user", "test_events"] {
        if let Some(section) = view.section(name) {
            println!("{}:", name);
            print_json(section);
        }
    }
    Ok(())
}
