//! Time-based one-time passwords (RFC 6238: HMAC-SHA1, 30 s step, 6 digits).

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::AuthError;

/// Step size used by the auth service.
const STEP_SECS: i64 = 30;

/// Generate the code for the current wall-clock step.
pub fn generate(shared_secret: &str) -> Result<String, AuthError> {
    generate_at(shared_secret, chrono::Utc::now().timestamp())
}

/// Generate the code for an explicit Unix timestamp.
pub fn generate_at(shared_secret: &str, unix_time: i64) -> Result<String, AuthError> {
    let key = decode_secret(shared_secret)?;
    let counter = (unix_time / STEP_SECS) as u64;
    let mut mac =
        Hmac::<Sha1>::new_from_slice(&key).map_err(|_| AuthError::InvalidSecretFormat)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();
    // Dynamic truncation: low nibble of the last byte picks the window.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let truncated = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    Ok(format!("{:06}", truncated % 1_000_000))
}

/// Decode the base32 shared secret, tolerating whitespace, padding, and
/// lowercase input as issued by enrollment QR payloads.
fn decode_secret(shared_secret: &str) -> Result<Vec<u8>, AuthError> {
    let normalized: String = shared_secret
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && *ch != '=')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    if normalized.is_empty() {
        return Err(AuthError::InvalidSecretFormat);
    }
    data_encoding::BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| AuthError::InvalidSecretFormat)
}
