use crate::commands::util::report;
use crate::commands::{CommandContext, CommandResult};
use crate::shutdown::wait_for_signal;
use calendesk::error::{login_error, rejected};
use calendesk::session::{complete_redirect, AuthTracker, LandingListener, RedirectOutcome, SessionHook};
use calendesk::views::diagnostics::DiagnosticsView;
use std::time::Duration;
use tracing::{info, warn};

fn tracker(ctx: &CommandContext) -> AuthTracker {
    AuthTracker::new(ctx.client.clone())
}

/// Show the current session
pub async fn status(ctx: &CommandContext) -> CommandResult {
    let hook = SessionHook::init(tracker(ctx)).await;

    match hook.user() {
        Some(user) => {
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Log in through the browser and wait for the backend to send us back
pub async fn login(ctx: &CommandContext, open_browser: bool) -> CommandResult {
    let mut hook = SessionHook::init(tracker(ctx)).await;
    if let Some(user) = hook.user() {
        println!("Already logged in as {}", user.email);
        return Ok(());
    }

    let listener = LandingListener::bind(&ctx.config.callback_addr)?;
    let navigation = hook.login()?;

    println!("Log in with Google at:\n  {}", navigation.url);
    if open_browser {
        if let Err(e) = webbrowser::open(navigation.url.as_str()) {
            warn!("Could not open a browser: {}", e);
        }
    }
    println!(
        "Waiting for the login redirect on http://{} (Ctrl+C to cancel)",
        ctx.config.callback_addr
    );

    let mut location = tokio::select! {
        result = listener.wait() => result?,
        _ = wait_for_signal() => return Err(login_error("Login cancelled")),
    };

    let delay = Duration::from_millis(ctx.config.propagation_delay_ms);
    match complete_redirect(&mut hook, &mut location, delay).await {
        Some(RedirectOutcome::Success) => match hook.user() {
            Some(user) => {
                info!("Login completed for {}", user.email);
                println!("Logged in as {} <{}>", user.name, user.email);
            }
            None => {
                println!("The browser login finished, but this client has no session yet.");
                println!("Copy the backend session cookie into SESSION_COOKIE and run `calendesk status`.");
            }
        },
        Some(outcome) => return Err(login_error(&outcome.message())),
        None => return Err(login_error("The redirect carried no login result")),
    }
    Ok(())
}

/// End the session
pub async fn logout(ctx: &CommandContext) -> CommandResult {
    let mut hook = SessionHook::init(tracker(ctx)).await;
    let result = hook.logout().await;

    if result.success {
        println!("{}", result.message);
        Ok(())
    } else {
        Err(rejected(&result.message))
    }
}

/// Show the profile of the logged in user
pub async fn profile(ctx: &CommandContext) -> CommandResult {
    match tracker(ctx).profile().await {
        Some(user) => {
            println!("Name:  {}", user.name);
            println!("Email: {}", user.email);
            if let Some(picture) = &user.picture {
                println!("Photo: {}", picture);
            }
            Ok(())
        }
        None => Err(rejected("No profile available; log in first")),
    }
}

/// Probe the backend, optionally through the auth and events endpoints too
pub async fn ping(ctx: &CommandContext, full: bool) -> CommandResult {
    let mut view = DiagnosticsView::new(tracker(ctx));
    println!("Backend: {}", view.backend_url());

    view.ping().await;
    report(view.state())?;

    if full {
        println!("Auth endpoint:");
        view.test_auth().await;
        report(view.state())?;

        println!("Events endpoint:");
        view.test_events().await;
        report(view.state())?;
    }
    Ok(())
}
