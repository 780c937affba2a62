// storefront/src/services/mod.rs

//! Clients for the external services the storefront talks to.

pub mod gemini;
pub mod google_identity;
pub mod session;
pub mod toss_payments;

pub use gemini::GeminiClient;
pub use google_identity::GoogleTokenVerifier;
pub use session::{IssuedSession, SessionClaims, SessionIssuer};
pub use toss_payments::TossPaymentsClient;
