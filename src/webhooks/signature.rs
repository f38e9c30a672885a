//! Webhook signature verification.
//!
//! When a webhook secret is configured, GitHub sends
//! `X-Hub-Signature-256: sha256=<hex>`, an HMAC-SHA256 of the raw body keyed
//! with that secret. Deliveries whose signature does not verify are rejected
//! before the body is parsed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a signature header against the raw body.
///
/// Returns `false` for malformed headers as well as for mismatches; the
/// comparison itself is constant-time.
///
/// # Examples
///
/// ```
/// use xdevbot::webhooks::{sign, verify_signature};
///
/// let header = sign(b"{}", b"secret");
/// assert!(verify_signature(b"{}", &header, b"secret"));
/// assert!(!verify_signature(b"{}", &header, b"other"));
/// assert!(!verify_signature(b"{}", "sha1=00", b"secret"));
/// ```
pub fn verify_signature(body: &[u8], header: &str, secret: &[u8]) -> bool {
    let Some(expected) = header
        .strip_prefix("sha256=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Produces the `X-Hub-Signature-256` header value GitHub would send.
///
/// Used to sign test deliveries.
pub fn sign(body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
