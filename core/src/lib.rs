// core/src/lib.rs

//! ZIBEN storefront domain core.
//!
//! This crate holds everything the storefront does that is not HTTP or SQL:
//!  - Payment confirmation against an external gateway, with best-effort order bookkeeping.
//!  - Role-aware order history reads and the admin sales summary.
//!  - Account registration, password and federated sign-in, and role assignment.
//!  - Catalog reads.
//!  - The chat relay to a generative-language model.
//!
//! Every external collaborator is a trait (see [`store`], [`payment::PaymentGateway`],
//! [`identity::FederatedVerifier`], [`chat::ChatModel`]), so the application wires real
//! clients in `main` and tests substitute fakes.

pub mod catalog;
pub mod chat;
pub mod error;
pub mod identity;
pub mod models;
pub mod orders;
pub mod payment;
pub mod store;

pub use crate::error::{Result, ZibenError};

pub use crate::catalog::CatalogReader;
pub use crate::chat::{ChatMessage, ChatModel, ChatRelay, ChatRequest, ChatTurn};
pub use crate::identity::{AdminPolicy, AuthIdentity, FederatedVerifier, IdentityService, Registration};
pub use crate::models::{
  Category, NewOrder, OrderRecord, PaymentDetails, PayerHints, Product, Role, UserProfile,
};
pub use crate::orders::{OrderHistoryReader, SalesSummary, Viewer};
pub use crate::payment::{
  ConfirmPaymentInput, ConfirmPaymentRequest, ConfirmedOrder, ConfirmedPayment, PaymentConfirmationService,
  PaymentGateway,
};
pub use crate::store::{CatalogStore, Credential, CredentialStore, OrderStore, ProfileStore};
