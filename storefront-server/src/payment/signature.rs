//! Webhook signature verification
//!
//! Midtrans signs every HTTP notification with
//! `sha512(order_id + status_code + gross_amount + server_key)`. A
//! notification whose `signature_key` does not match is discarded before any
//! order state is touched.

use sha2::{Digest, Sha512};

/// Compute the expected notification signature
pub fn notification_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a received `signature_key` against the recomputed hash
pub fn verify(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
    signature_key: &str,
) -> bool {
    notification_signature(order_id, status_code, gross_amount, server_key) == signature_key
}
