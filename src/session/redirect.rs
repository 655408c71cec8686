use super::SessionHook;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Read/rewrite access to the location the login flow landed on
pub trait Location {
    /// Decoded query parameters, in order
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// Remove the query from the visible location
    fn strip_query(&mut self);
}

/// A location backed by a plain URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlLocation {
    url: Url,
}

impl UrlLocation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Location for UrlLocation {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn strip_query(&mut self) {
        self.url.set_query(None);
    }
}

/// How the provider login ended, as reported by the landing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Success,
    Failure { code: String, message: Option<String> },
}

impl RedirectOutcome {
    /// Text to show the user
    pub fn message(&self) -> String {
        match self {
            RedirectOutcome::Success => "Authentication successful".to_string(),
            RedirectOutcome::Failure { code, message } => {
                format!("Authentication error: {}", message.as_deref().unwrap_or(code))
            }
        }
    }
}

/// Inspect the landing parameters. When a login result is present the
/// parameters are stripped from the location.
pub fn detect_redirect<L: Location + ?Sized>(location: &mut L) -> Option<RedirectOutcome> {
    let pairs = location.query_pairs();
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let outcome = if get("success").as_deref() == Some("true") {
        RedirectOutcome::Success
    } else if let Some(code) = get("error") {
        RedirectOutcome::Failure {
            code,
            message: get("message"),
        }
    } else {
        return None;
    };

    location.strip_query();
    Some(outcome)
}

/// Finish a redirect-based login: on success wait `delay` for the backend
/// cookie to settle and re-check the session, on failure record the error.
pub async fn complete_redirect<L: Location + ?Sized>(
    hook: &mut SessionHook,
    location: &mut L,
    delay: Duration,
) -> Option<RedirectOutcome> {
    let outcome = detect_redirect(location)?;

    match &outcome {
        RedirectOutcome::Success => {
            info!("Login redirect succeeded, re-checking session in {:?}", delay);
            tokio::time::sleep(delay).await;
            hook.check_auth().await;
        }
        RedirectOutcome::Failure { .. } => {
            warn!("{}", outcome.message());
            hook.set_error(outcome.message());
        }
    }

    Some(outcome)
}
