// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

// One year.
const MAX_SESSION_TTL_MINUTES: u64 = 525_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  // Toss Payments confirmation API
  pub toss_secret_key: String,
  pub toss_api_base: String,

  // Sessions
  pub jwt_secret: String,
  pub session_ttl: Duration,

  // Comma-separated administrator allow-list
  pub admin_emails: String,

  // Federated sign-in is disabled when no client id is configured
  pub google_client_id: Option<String>,
  pub google_tokeninfo_url: String,

  pub gemini_api_base: String,

  pub seed_db: bool,
  pub log_format: LogFormat,
}

// Secrets stay out of Debug output, which ends up in logs.
impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("database_max_connections", &self.database_max_connections)
      .field("toss_secret_key", &"[REDACTED]")
      .field("toss_api_base", &self.toss_api_base)
      .field("jwt_secret", &"[REDACTED]")
      .field("session_ttl", &self.session_ttl)
      .field("admin_emails", &self.admin_emails)
      .field("google_client_id", &self.google_client_id)
      .field("google_tokeninfo_url", &self.google_tokeninfo_url)
      .field("gemini_api_base", &self.gemini_api_base)
      .field("seed_db", &self.seed_db)
      .field("log_format", &self.log_format)
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. `from_env` passes the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let or_default = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|_| default.to_string());

    let server_host = or_default("SERVER_HOST", "127.0.0.1");
    let server_port = or_default("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections = or_default("DATABASE_MAX_CONNECTIONS", "5")
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;

    let toss_secret_key = get_env("TOSS_SECRET_KEY")?;
    let toss_api_base = trim_base(or_default("TOSS_API_BASE", "https://api.tosspayments.com"));

    let jwt_secret = get_env("JWT_SECRET")?;
    let session_minutes = or_default("SESSION_TTL_MINUTES", "1440")
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_MINUTES: {}", e)))?;
    if session_minutes == 0 || session_minutes > MAX_SESSION_TTL_MINUTES {
      return Err(AppError::Config(format!(
        "SESSION_TTL_MINUTES must be between 1 and {}, got {}",
        MAX_SESSION_TTL_MINUTES, session_minutes
      )));
    }

    let admin_emails = or_default("ADMIN_EMAILS", "");
    let google_client_id = get_env("GOOGLE_CLIENT_ID").ok();
    let google_tokeninfo_url = or_default("GOOGLE_TOKENINFO_URL", "https://oauth2.googleapis.com/tokeninfo");
    let gemini_api_base = trim_base(or_default(
      "GEMINI_API_BASE",
      "https://generativelanguage.googleapis.com",
    ));

    let seed_db = or_default("SEED_DB", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;
    let log_format = match or_default("LOG_FORMAT", "text").to_lowercase().as_str() {
      "text" => LogFormat::Text,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      toss_secret_key,
      toss_api_base,
      jwt_secret,
      session_ttl: Duration::from_secs(session_minutes * 60),
      admin_emails,
      google_client_id,
      google_tokeninfo_url,
      gemini_api_base,
      seed_db,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn trim_base(url: String) -> String {
  url.trim_end_matches('/').to_string()
}
