//! Ed25519 verification of interaction webhooks.
//!
//! Discord signs `timestamp || body` with the application's key and sends the
//! signature and timestamp as headers; unverified requests must be rejected
//! with 401 or Discord disables the endpoint.

use anyhow::Context;
use ed25519_dalek::{Signature, VerifyingKey};

/// Parse the hex-encoded public key from the developer portal.
pub fn parse_public_key(hex_key: &str) -> anyhow::Result<VerifyingKey> {
    let bytes = hex::decode(hex_key).context("public key is not valid hex")?;
    let bytes: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("public key must be 32 bytes"))?;
    VerifyingKey::from_bytes(&bytes).context("public key is not a valid Ed25519 point")
}

/// Check one request. Any malformed input verifies as false.
pub fn verify_signature(
    key: &VerifyingKey,
    signature_hex: &str,
    timestamp: &str,
    body: &[u8],
) -> bool {
    let Ok(signature_bytes) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&signature_bytes) else {
        return false;
    };
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    key.verify_strict(&message, &signature).is_ok()
}
