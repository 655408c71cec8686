//! Per-view request state and the views built on it.
//!
//! Every user action in a view goes through the same cycle:
//! `Idle -> Loading -> Success | Error`, and a new trigger from `Success` or
//! `Error` starts over at `Loading` with the previous result dropped.
//! Triggering while `Loading` does nothing.
//!
//! Results are applied in the order they resolve. A slower, older request can
//! overwrite a newer one's result; nothing here discards stale responses.

pub mod console;
pub mod diagnostics;
pub mod event_form;
pub mod event_list;
pub mod status;
pub mod test_events;

use crate::error::ClientResult;
use std::fmt;
use std::future::Future;

/// Outcome of the last triggered action
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestOutcome<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

/// Data-free view of [`RequestOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request state for one action of one view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState<T> {
    outcome: RequestOutcome<T>,
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self {
            outcome: RequestOutcome::Idle,
        }
    }

    pub fn outcome(&self) -> &RequestOutcome<T> {
        &self.outcome
    }

    pub fn status(&self) -> Status {
        match self.outcome {
            RequestOutcome::Idle => Status::Idle,
            RequestOutcome::Loading => Status::Loading,
            RequestOutcome::Success(_) => Status::Success,
            RequestOutcome::Error(_) => Status::Error,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.outcome, RequestOutcome::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match &self.outcome {
            RequestOutcome::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.outcome {
            RequestOutcome::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RequestOutcome::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Start an action. Returns `false`, changing nothing, when one is
    /// already in flight; otherwise drops any previous data or error.
    pub fn trigger(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.outcome = RequestOutcome::Loading;
        true
    }

    pub fn resolve(&mut self, data: T) {
        self.outcome = RequestOutcome::Success(data);
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.outcome = RequestOutcome::Error(message.into());
    }

    /// Apply a finished request
    pub fn settle(&mut self, result: ClientResult<T>) {
        match result {
            Ok(data) => self.resolve(data),
            Err(e) => self.reject(e.to_string()),
        }
    }

    /// Back to `Idle` with no data and no error
    pub fn clear(&mut self) {
        self.outcome = RequestOutcome::Idle;
    }

    /// Trigger, run the action and settle with its result. The action is
    /// not started when the state is already loading; returns whether it ran.
    pub async fn run<F, Fut>(&mut self, action: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if !self.trigger() {
            return false;
        }
        let result = action().await;
        self.settle(result);
        true
    }
}

/// Suggestions to show next to an error message
pub fn remediation_hints(message: &str) -> Vec<&'static str> {
    let mut hints = Vec::new();

    if message.contains("401") {
        hints.extend([
            "Log in with Google first (calendesk login)",
            "Check that the backend is running and BACKEND_URL points at it",
            "Check that the session cookie is being sent (SESSION_COOKIE)",
        ]);
    }

    if message.contains("CALENDLY_ACCESS_TOKEN") {
        hints.extend([
            "Set CALENDLY_ACCESS_TOKEN in the backend environment",
            "Or connect the account with `calendesk calendly connect`",
        ]);
    }

    hints
}
