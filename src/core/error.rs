//! Error taxonomy surfaced to the screens.
//!
//! Repositories and backends work in `anyhow::Result`; the auth and directory
//! layers translate their failures into one of these variants so the UI can
//! tell a rejected login apart from an unreachable server or an empty result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KioskError {
    /// The auth service rejected the credentials.
    #[error("Login failed: {message}")]
    AuthFailure { message: String },

    /// Email or password left blank. Raised before any network call.
    #[error("Please enter your email and password.")]
    MissingFields,

    /// A fetch against the data store failed. Never collapsed into an empty list.
    #[error("Could not load data: {0:#}")]
    DataFetch(#[source] anyhow::Error),

    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

pub type Result<T> = std::result::Result<T, KioskError>;

impl KioskError {
    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::AuthFailure {
            message: message.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Title used for the blocking notice shown on the login screen.
    pub fn title(&self) -> &'static str {
        match self {
            KioskError::AuthFailure { .. } => "Login failed",
            KioskError::MissingFields => "Missing fields",
            KioskError::DataFetch(_) => "Connection problem",
            KioskError::Config { .. } => "Configuration error",
        }
    }

    /// Message body without the title prefix.
    pub fn detail(&self) -> String {
        match self {
            KioskError::AuthFailure { message } => message.clone(),
            KioskError::DataFetch(source) => format!("{source:#}"),
            other => other.to_string(),
        }
    }
}
