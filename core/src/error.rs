// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZibenError {
  /// Missing or malformed input. Raised before any external call is made.
  #[error("Validation failed: {0}")]
  Validation(String),

  /// The payment gateway answered the confirmation with a non-success status.
  #[error("Payment gateway rejected the confirmation (status {status}): {message}")]
  PaymentGateway {
    status: u16,
    code: Option<String>,
    message: String,
  },

  /// The gateway could not be reached or answered with something unreadable.
  #[error("Payment gateway unavailable: {0}")]
  GatewayUnavailable(String),

  #[error("Persistence operation failed. Source: {source}")]
  Persistence {
    #[source]
    source: AnyhowError,
  },

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Authentication failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Not found: {0}")]
  NotFound(String),

  /// Rate limit or quota exhaustion reported by the chat model upstream.
  #[error("Upstream quota exceeded: {0}")]
  UpstreamQuota(String),

  #[error("Upstream service error (status {status}): {message}")]
  Upstream { status: u16, message: String },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl ZibenError {
  /// Wraps a storage driver error.
  pub fn persistence<E>(err: E) -> Self
  where
    E: Into<AnyhowError>,
  {
    ZibenError::Persistence { source: err.into() }
  }

  /// Stable machine-readable slug for the error kind. Gateway errors use the gateway's own code.
  pub fn code(&self) -> Option<&str> {
    match self {
      ZibenError::Validation(_) => Some("VALIDATION_ERROR"),
      ZibenError::PaymentGateway { code, .. } => code.as_deref(),
      ZibenError::GatewayUnavailable(_) => Some("GATEWAY_UNAVAILABLE"),
      ZibenError::Persistence { .. } => Some("PERSISTENCE_ERROR"),
      ZibenError::Conflict(_) => Some("CONFLICT"),
      ZibenError::Auth(_) => Some("UNAUTHORIZED"),
      ZibenError::Forbidden(_) => Some("FORBIDDEN"),
      ZibenError::NotFound(_) => Some("NOT_FOUND"),
      ZibenError::UpstreamQuota(_) => Some("UPSTREAM_QUOTA_EXCEEDED"),
      ZibenError::Upstream { .. } => Some("UPSTREAM_ERROR"),
      ZibenError::Internal(_) => Some("INTERNAL_ERROR"),
    }
  }
}

pub type Result<T, E = ZibenError> = std::result::Result<T, E>;
