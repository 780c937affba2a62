// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Map, Value};
use thiserror::Error;

use ziben::payment::failure::describe_failure;
use ziben::ZibenError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Domain(#[from] ZibenError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Database Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn validation(message: impl Into<String>) -> Self {
    AppError::Domain(ZibenError::Validation(message.into()))
  }

  pub fn unauthorized(message: impl Into<String>) -> Self {
    AppError::Domain(ZibenError::Auth(message.into()))
  }

  pub fn forbidden(message: impl Into<String>) -> Self {
    AppError::Domain(ZibenError::Forbidden(message.into()))
  }
}

fn domain_status(err: &ZibenError) -> StatusCode {
  match err {
    ZibenError::Validation(_) => StatusCode::BAD_REQUEST,
    ZibenError::PaymentGateway { status, .. } => StatusCode::from_u16(*status)
      .ok()
      .filter(|s| s.is_client_error() || s.is_server_error())
      .unwrap_or(StatusCode::BAD_REQUEST),
    ZibenError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
    ZibenError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    ZibenError::Conflict(_) => StatusCode::CONFLICT,
    ZibenError::Auth(_) => StatusCode::UNAUTHORIZED,
    ZibenError::Forbidden(_) => StatusCode::FORBIDDEN,
    ZibenError::NotFound(_) => StatusCode::NOT_FOUND,
    ZibenError::UpstreamQuota(_) => StatusCode::TOO_MANY_REQUESTS,
    ZibenError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    ZibenError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// Message shown to the client. Internal details stay in the logs.
fn domain_message(err: &ZibenError) -> String {
  match err {
    ZibenError::Validation(m)
    | ZibenError::Conflict(m)
    | ZibenError::Auth(m)
    | ZibenError::Forbidden(m)
    | ZibenError::NotFound(m) => m.clone(),
    ZibenError::PaymentGateway { message, .. } if !message.trim().is_empty() => message.clone(),
    ZibenError::PaymentGateway { .. } => "결제 승인에 실패했습니다.".to_string(),
    ZibenError::GatewayUnavailable(_) => "결제 승인 처리 중 오류가 발생했습니다.".to_string(),
    ZibenError::UpstreamQuota(_) => {
      "API 할당량이 초과되었습니다. 잠시 후 다시 시도하거나 다른 모델을 선택해주세요.".to_string()
    }
    ZibenError::Upstream { message, .. } => message.clone(),
    ZibenError::Persistence { .. } => "Database operation failed".to_string(),
    ZibenError::Internal(_) => "An internal error occurred".to_string(),
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Domain(err) => domain_status(err),
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }

    let mut body = Map::new();
    match self {
      AppError::Domain(err) => {
        body.insert("message".into(), Value::String(domain_message(err)));
        if let Some(code) = err.code() {
          body.insert("code".into(), Value::String(code.to_string()));
        }
        if let ZibenError::PaymentGateway { code, message, .. } = err {
          body.insert(
            "localizedMessage".into(),
            Value::String(describe_failure(code.as_deref(), Some(message.as_str()))),
          );
        }
      }
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        body.insert("message".into(), json!("An internal error occurred"));
        body.insert("code".into(), json!("INTERNAL_ERROR"));
      }
    }

    HttpResponse::build(status).json(Value::Object(body))
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
