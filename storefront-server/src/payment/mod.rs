//! Payment gateway integration
//!
//! # Structure
//!
//! - [`midtrans`] - Snap / core-API HTTP client behind the [`PaymentGateway`] trait
//! - [`signature`] - webhook notification signature verification

pub mod midtrans;
pub mod signature;

pub use midtrans::{
    GatewayError, MidtransClient, PaymentGateway, SnapTransaction, SnapTransactionRequest,
    TransactionStatusResponse,
};
