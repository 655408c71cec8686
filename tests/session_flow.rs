//! Session tracking and the login redirect against a mock backend.

mod support;

use calendesk::api::models::Session;
use calendesk::session::{complete_redirect, AuthTracker, RedirectOutcome, SessionHook, UrlLocation};
use serde_json::json;
use std::time::Duration;
use support::{authenticated, can_bind_localhost, client_for, unreachable_client};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn landing(query: &str) -> UrlLocation {
    UrlLocation::new(Url::parse(&format!("http://127.0.0.1:5173/{}", query)).unwrap())
}

#[tokio::test]
async fn test_hook_picks_up_authenticated_user() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authenticated("a@b.com")))
        .expect(1)
        .mount(&server)
        .await;

    let hook = SessionHook::init(AuthTracker::new(client_for(&server))).await;
    assert!(!hook.loading());
    assert!(hook.is_authenticated());
    assert_eq!(hook.user().map(|u| u.email.as_str()), Some("a@b.com"));
}

#[tokio::test]
async fn test_authenticated_without_user_is_logged_out() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": true })))
        .mount(&server)
        .await;

    let hook = SessionHook::init(AuthTracker::new(client_for(&server))).await;
    assert!(hook.user().is_none());
    assert!(!hook.loading());
}

#[tokio::test]
async fn test_status_failure_is_anonymous() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tracker = AuthTracker::new(client_for(&server));
    assert_eq!(tracker.check_status().await, Session::anonymous());

    let hook = SessionHook::init(tracker).await;
    assert!(hook.user().is_none());
    assert!(!hook.loading());
    assert!(hook.error().is_none());
}

#[tokio::test]
async fn test_profile_read() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "a@b.com",
            "name": "Ann",
            "picture": "https://img/ann.png",
            "googleId": "g-1",
        })))
        .mount(&server)
        .await;

    let profile = AuthTracker::new(client_for(&server)).profile().await.unwrap();
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.google_id.as_deref(), Some("g-1"));
}

#[tokio::test]
async fn test_logout_success_clears_user_and_rechecks() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authenticated("a@b.com")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut hook = SessionHook::init(AuthTracker::new(client_for(&server))).await;
    assert!(hook.is_authenticated());

    let result = hook.logout().await;
    assert!(result.success);
    assert_eq!(result.message, "Logged out successfully");
    assert!(hook.user().is_none());
    assert!(hook.error().is_none());
}

#[tokio::test]
async fn test_logout_rejected_keeps_user() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authenticated("a@b.com")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut hook = SessionHook::init(AuthTracker::new(client_for(&server))).await;
    let result = hook.logout().await;

    assert!(!result.success);
    assert_eq!(result.message, "Error logging out");
    assert_eq!(hook.error(), Some("Error logging out"));
    assert!(hook.is_authenticated());
}

#[tokio::test]
async fn test_logout_transport_failure_reports() {
    let result = AuthTracker::new(unreachable_client()).logout().await;
    assert!(!result.success);
    assert!(!result.message.is_empty());
}

#[tokio::test]
async fn test_redirect_success_rechecks_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authenticated("a@b.com")))
        .mount(&server)
        .await;

    let mut hook = SessionHook::init(AuthTracker::new(client_for(&server))).await;
    assert!(hook.user().is_none());

    let mut location = landing("?success=true");
    let outcome = complete_redirect(&mut hook, &mut location, Duration::ZERO).await;

    assert_eq!(outcome, Some(RedirectOutcome::Success));
    assert_eq!(location.url().query(), None);
    assert_eq!(hook.user().map(|u| u.email.as_str()), Some("a@b.com"));
}

#[tokio::test]
async fn test_redirect_error_sets_hook_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })))
        .expect(1)
        .mount(&server)
        .await;

    let mut hook = SessionHook::init(AuthTracker::new(client_for(&server))).await;
    let mut location = landing("?error=access_denied&message=User%20cancelled");
    let outcome = complete_redirect(&mut hook, &mut location, Duration::ZERO).await;

    assert!(matches!(outcome, Some(RedirectOutcome::Failure { .. })));
    assert_eq!(hook.error(), Some("Authentication error: User cancelled"));
    assert_eq!(location.url().query(), None);
}

#[tokio::test]
async fn test_plain_landing_does_nothing() {
    let mut hook = SessionHook::init(AuthTracker::new(unreachable_client())).await;
    let mut location = landing("?tab=events");

    let outcome = complete_redirect(&mut hook, &mut location, Duration::ZERO).await;
    assert_eq!(outcome, None);
    assert_eq!(location.url().query(), Some("tab=events"));
    assert!(hook.error().is_none());
}
