//! Errors produced by the API gateway client.

use thiserror::Error;

/// Failure of a single HTTP exchange.
///
/// Callers do not branch on cause beyond [`RequestError::is_not_found`];
/// the `Display` output is what the operator sees.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the response body text, or the status line when the
    /// body was empty.
    #[error("Erro na requisição ({status}): {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("Erro de rede: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body could not be decoded.
    #[error("Resposta inválida do servidor: {0}")]
    Decode(String),
}

impl RequestError {
    /// Build a status error, falling back to the status line for an empty body.
    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string())
        } else {
            body.to_string()
        };

        Self::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    /// Returns true for a 404 answer.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
