//! Outbound customer notifications

pub mod whatsapp;

pub use whatsapp::{NotifyError, WhatsAppNotifier, normalize_phone};
