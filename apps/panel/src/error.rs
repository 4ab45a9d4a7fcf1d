//! Error types for the panel and their mapping onto failure kinds.

use thiserror::Error;

use crate::models::AppointmentId;

/// Generic message used when the server rejects a request without a body we can read.
pub const UNKNOWN_SERVER_ERROR: &str = "Error desconocido del servidor";

/// Everything that can go wrong between the panel and the scheduling server.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Network failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 2xx body that is not the expected JSON (e.g. an HTML login page).
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-2xx response.
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    /// The response decoded but the expected top-level field was absent.
    #[error("unexpected response: missing field `{0}`")]
    MissingField(&'static str),

    /// The appointment is not in the loaded collection.
    #[error("appointment {0} not found")]
    AppointmentNotFound(AppointmentId),

    /// A required form field was left empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// An endpoint template produced an invalid URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Coarse classification used by the fail-soft call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    PayloadShape,
    Lookup,
    Validation,
}

impl PanelError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PanelError::Http(_) | PanelError::Status { .. } | PanelError::Url(_) => {
                FailureKind::Transport
            }
            PanelError::MissingField(_) | PanelError::Decode(_) => FailureKind::PayloadShape,
            PanelError::AppointmentNotFound(_) => FailureKind::Lookup,
            PanelError::Validation(_) => FailureKind::Validation,
        }
    }

    /// Build a `Status` error, falling back to the generic message when the
    /// server did not supply one.
    pub fn status(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string());
        PanelError::Status { status, message }
    }
}

pub type PanelResult<T> = Result<T, PanelError>;
