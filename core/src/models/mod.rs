// core/src/models/mod.rs

//! Data structures stored by the storefront and exchanged with the gateway.

pub mod order;
pub mod payment;
pub mod product;
pub mod profile;

pub use order::{NewOrder, OrderRecord};
pub use payment::{PayerHints, PaymentDetails};
pub use product::{Category, Product};
pub use profile::{Role, UserProfile};
