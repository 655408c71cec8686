//! Authentication session tracking.
//!
//! The session token itself lives in a backend-set cookie; this module only
//! asks the backend what it thinks of that cookie.

mod landing;
mod redirect;

pub use landing::LandingListener;
pub use redirect::{complete_redirect, detect_redirect, Location, RedirectOutcome, UrlLocation};

use crate::api::models::{LogoutResult, Session, UserProfile};
use crate::api::{ApiClient, GOOGLE_AUTH_PATH};
use crate::error::ClientResult;
use tracing::{error, info, warn};
use url::Url;

/// Full-page navigation the caller must perform to log in.
/// There is nothing to await: the browser owns the rest of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: Url,
}

/// Wraps the authentication endpoints. None of its operations fail.
#[derive(Debug, Clone)]
pub struct AuthTracker {
    client: ApiClient,
}

impl AuthTracker {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Ask the backend for the current session. Any failure is treated as
    /// "not logged in".
    pub async fn check_status(&self) -> Session {
        match self.client.auth().status().await {
            Ok(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Unexpected auth status payload: {}", e);
                Session::anonymous()
            }),
            Err(e) => {
                error!("Error checking auth status: {}", e);
                Session::anonymous()
            }
        }
    }

    /// Where to send the browser to start the provider login
    pub fn login(&self) -> ClientResult<Navigation> {
        Ok(Navigation {
            url: self.client.url(GOOGLE_AUTH_PATH)?,
        })
    }

    /// End the backend session
    pub async fn logout(&self) -> LogoutResult {
        match self.client.auth().logout().await {
            Ok(response) if response.status().is_success() => {
                info!("Logged out");
                LogoutResult {
                    success: true,
                    message: "Logged out successfully".to_string(),
                }
            }
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Logout rejected");
                LogoutResult {
                    success: false,
                    message: "Error logging out".to_string(),
                }
            }
            Err(e) => {
                error!("Error logging out: {}", e);
                LogoutResult {
                    success: false,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Profile of the logged in user, `None` on any failure
    pub async fn profile(&self) -> Option<UserProfile> {
        match self.client.auth().profile().await {
            Ok(value) => serde_json::from_value(value)
                .map_err(|e| warn!("Unexpected profile payload: {}", e))
                .ok(),
            Err(e) => {
                error!("Error getting profile: {}", e);
                None
            }
        }
    }
}

/// Session state exposed to views: who is logged in and whether a check is
/// still running.
#[derive(Debug)]
pub struct SessionHook {
    tracker: AuthTracker,
    user: Option<UserProfile>,
    loading: bool,
    error: Option<String>,
}

impl SessionHook {
    /// Create the hook and run the initial status check
    pub async fn init(tracker: AuthTracker) -> Self {
        let mut hook = Self {
            tracker,
            user: None,
            loading: true,
            error: None,
        };
        hook.check_auth().await;
        hook
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn tracker(&self) -> &AuthTracker {
        &self.tracker
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Re-run the status check and replace the current user
    pub async fn check_auth(&mut self) {
        self.loading = true;
        let session = self.tracker.check_status().await;

        self.user = match session {
            Session {
                authenticated: true,
                user: Some(user),
            } => Some(user),
            _ => None,
        };
        self.loading = false;
    }

    pub fn login(&self) -> ClientResult<Navigation> {
        self.tracker.login()
    }

    /// Log out; on success the user is cleared and the session re-checked
    pub async fn logout(&mut self) -> LogoutResult {
        let result = self.tracker.logout().await;
        if result.success {
            self.user = None;
            self.error = None;
            self.check_auth().await;
        } else {
            self.error = Some(result.message.clone());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_points_at_provider_endpoint() {
        let tracker = AuthTracker::new(ApiClient::new("http://localhost:3000").unwrap());
        let navigation = tracker.login().unwrap();
        assert_eq!(navigation.url.as_str(), "http://localhost:3000/auth/google");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_anonymous() {
        // Port 9 (discard) is closed on any sane test machine
        let tracker = AuthTracker::new(ApiClient::new("http://127.0.0.1:9").unwrap());

        assert_eq!(tracker.check_status().await, Session::anonymous());
        assert!(tracker.profile().await.is_none());

        let result = tracker.logout().await;
        assert!(!result.success);
        assert!(!result.message.is_empty());
    }
}
