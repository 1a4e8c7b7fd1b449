//! Order lifecycle
//!
//! # Structure
//!
//! - [`status`] - canonical status vocabulary and customer-facing labels
//! - [`reconcile`] - the status reconciliation engine (pure)
//! - [`mutation`] - the mutation gateway, the only writer of order status

pub mod mutation;
pub mod reconcile;
pub mod status;

pub use mutation::{GatewayNotification, MutationError, MutationGateway, RecheckOutcome, WebhookOutcome};
pub use reconcile::Resolution;
pub use status::{FraudStatus, GatewayStatus, LiveStatus, OrderStatus};
