use super::{ApiClient, RequestOptions};
use crate::error::ClientResult;
use reqwest::{Method, Response};
use serde_json::Value;

pub const GOOGLE_AUTH_PATH: &str = "/auth/google";
pub const STATUS_PATH: &str = "/auth/status";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const PROFILE_PATH: &str = "/auth/profile";

/// Authentication endpoints
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Hit the provider login endpoint directly; useful as an auth smoke test
    pub async fn google(self) -> ClientResult<Value> {
        self.client.request(GOOGLE_AUTH_PATH, RequestOptions::get()).await
    }

    pub async fn login(self, credentials: Value) -> ClientResult<Value> {
        self.client
            .request("/auth/login", RequestOptions::post(credentials))
            .await
    }

    pub async fn profile(self) -> ClientResult<Value> {
        self.client.request(PROFILE_PATH, RequestOptions::get()).await
    }

    pub async fn verify(self) -> ClientResult<Value> {
        self.client.request("/auth/verify", RequestOptions::get()).await
    }

    pub async fn status(self) -> ClientResult<Value> {
        self.client.request(STATUS_PATH, RequestOptions::get()).await
    }

    /// Logout only cares about the status, so the raw response is returned
    pub async fn logout(self) -> ClientResult<Response> {
        self.client
            .send(
                LOGOUT_PATH,
                RequestOptions {
                    method: Method::POST,
                    ..RequestOptions::default()
                },
            )
            .await
    }
}
