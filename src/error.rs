use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the client
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The backend answered with a status outside 2xx. The body is discarded.
    #[error("HTTP error! status: {status}")]
    #[diagnostic(code(calendesk::http))]
    Http { status: u16 },

    /// Network unreachable, DNS, connection refused and friends
    #[error("{0}")]
    #[diagnostic(code(calendesk::transport))]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body is not valid JSON
    #[error("{0}")]
    #[diagnostic(code(calendesk::parse))]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    #[diagnostic(code(calendesk::url))]
    Url(#[from] url::ParseError),

    #[error("Environment error: {0}")]
    #[diagnostic(code(calendesk::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendesk::config))]
    Config(String),

    #[error("Login error: {0}")]
    #[diagnostic(code(calendesk::login))]
    Login(String),

    #[error(transparent)]
    #[diagnostic(code(calendesk::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendesk::serialization))]
    Serialization(String),

    /// A request that went through but reported failure, shown as-is
    #[error("{0}")]
    #[diagnostic(code(calendesk::rejected))]
    Rejected(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendesk::other))]
    Other(String),
}

impl Error {
    /// HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ClientResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create login errors
pub fn login_error(message: &str) -> Error {
    Error::Login(message.to_string())
}

/// Helper to create rejection errors
pub fn rejected(message: &str) -> Error {
    Error::Rejected(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
