//! HTTP client for the scheduling backend.
//!
//! Every call is a single attempt: no retry, no timeout, no backoff. Cookies
//! are kept in an in-memory jar and attached to each request unless the
//! caller opts out with [`Credentials::Omit`].

mod auth;
mod calendly;
pub mod models;

pub use auth::{AuthApi, GOOGLE_AUTH_PATH};
pub use calendly::{query_string, CalendlyApi, CONNECT_PATH};

use crate::config::Config;
use crate::error::{config_error, ClientResult, Error};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

/// Whether the cookie jar is attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

/// Per-request options. Defaults to a credentialed GET without a body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub credentials: Credentials,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    /// Add a header that takes precedence over the defaults
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Headers sent with every request unless the caller overrides them
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Caller headers replace defaults with the same name
fn merge_headers(overrides: &HeaderMap) -> HeaderMap {
    let mut headers = default_headers();
    for (name, value) in overrides {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

/// Client bound to a single backend origin
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    jar: Arc<Jar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the given backend origin
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed = Url::parse(base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(config_error(&format!("Backend URL is not a base URL: {}", base_url)));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().build()?,
            jar: Arc::new(Jar::default()),
        })
    }

    /// Create a client from configuration, seeding the session cookie if set
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let client = Self::new(&config.backend_url)?;
        if let Some(cookie) = &config.session_cookie {
            client.add_cookie(cookie)?;
        }
        Ok(client)
    }

    /// Put a `name=value` cookie for the backend origin into the jar
    pub fn add_cookie(&self, cookie: &str) -> ClientResult<()> {
        let origin = Url::parse(&self.base_url)?;
        self.jar.add_cookie_str(cookie, &origin);
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the backend origin
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn calendly(&self) -> CalendlyApi<'_> {
        CalendlyApi::new(self)
    }

    /// Send a request and return the raw response regardless of its status.
    /// Cookies set by the backend are stored when credentials are included.
    pub async fn send(&self, path: &str, options: RequestOptions) -> ClientResult<Response> {
        let url = self.url(path)?;
        let headers = merge_headers(&options.headers);

        debug!(
            %url,
            method = %options.method,
            credentials = ?options.credentials,
            "API request"
        );

        let mut builder = self.client.request(options.method, url.clone()).headers(headers);

        if options.credentials == Credentials::Include {
            if let Some(cookie) = self.jar.cookies(&url) {
                builder = builder.header(COOKIE, cookie);
            }
        }

        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| {
            error!("API request error for {}: {}", url, e);
            Error::Transport(e)
        })?;

        debug!(status = response.status().as_u16(), url = %response.url(), "API response");

        if options.credentials == Credentials::Include {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            self.jar.set_cookies(&mut set_cookies, &url);
        }

        Ok(response)
    }

    /// Issue a request and parse the JSON body of a 2xx response verbatim.
    /// Any other status fails with [`Error::Http`].
    pub async fn request(&self, path: &str, options: RequestOptions) -> ClientResult<Value> {
        let response = self.send(path, options).await?;
        let status = response.status();

        if !status.is_success() {
            error!(status = status.as_u16(), url = %response.url(), "API error response");
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let data: Value = serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            Error::Parse(e)
        })?;

        debug!("API success response");
        Ok(data)
    }
}
