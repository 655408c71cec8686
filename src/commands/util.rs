use crate::commands::CommandResult;
use calendesk::api::models::Event;
use calendesk::error::{rejected, Error};
use calendesk::utils::time::format_event_time;
use calendesk::views::{remediation_hints, ViewState};
use serde_json::Value;

/// Parse a `key=value` command line argument
pub fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Expected key=value, got '{}'", arg)),
    }
}

/// Pretty print a JSON value to stdout
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

/// Print the suggestions that go with an error message
pub fn print_hints(message: &str) {
    let hints = remediation_hints(message);
    if hints.is_empty() {
        return;
    }

    eprintln!("Possible fixes:");
    for hint in hints {
        eprintln!("  - {}", hint);
    }
}

/// Print a settled view state, turning an error state into a command error
pub fn report(state: &ViewState<Value>) -> CommandResult {
    if let Some(message) = state.error() {
        print_hints(message);
        return Err(rejected(message));
    }

    if let Some(data) = state.data() {
        print_json(data);
    }
    Ok(())
}

/// Print a request result directly
pub fn report_result(result: Result<Value, Error>) -> CommandResult {
    match result {
        Ok(value) => {
            print_json(&value);
            Ok(())
        }
        Err(e) => {
            print_hints(&e.to_string());
            Err(e)
        }
    }
}

/// One line per event: start, name, status and URI
pub fn format_event_line(event: &Event) -> String {
    let mut line = format!(
        "{:<28} {}",
        format_event_time(event.start_time.as_deref()),
        event.name.as_deref().unwrap_or("(untitled)")
    );

    if let Some(status) = &event.status {
        line.push_str(&format!(" [{}]", status));
    }
    if let Some(location) = event.location_text() {
        line.push_str(&format!(" @ {}", location));
    }
    if !event.uri.is_empty() {
        line.push_str(&format!("\n{:<28} {}", "", event.uri));
    }
    line
}
