//! Correlation ids, secrets and endpoint identifiers.
//!
//! An endpoint is `<correlation-id><nonce>.<domain>`. The service routes any
//! name with a registered correlation-id prefix to that session, so every
//! call can use a fresh nonce.

use uuid::Uuid;

/// Length of the correlation id registered with the service.
pub const CORRELATION_ID_LENGTH: usize = 20;

/// Length of the per-endpoint random suffix.
pub const NONCE_LENGTH: usize = 13;

/// Generate a new lowercase alphanumeric correlation id.
pub fn correlation_id() -> String {
    random_label(CORRELATION_ID_LENGTH)
}

/// Generate the secret proving ownership of a correlation id.
pub fn secret_key() -> String {
    Uuid::new_v4().to_string()
}

/// Build a fresh endpoint identifier for `correlation_id` under `domain`.
pub fn endpoint_url(correlation_id: &str, domain: &str) -> String {
    format!("{correlation_id}{}.{domain}", random_label(NONCE_LENGTH))
}

fn random_label(len: usize) -> String {
    let mut label = String::with_capacity(len + 32);
    while label.len() < len {
        label.push_str(&Uuid::new_v4().simple().to_string());
    }
    label.truncate(len);
    label
}
