//! Deterministic token generation.

/// Derive the token for a plaintext value.
///
/// MD5 over the UTF-8 bytes, rendered as 32 lowercase hex characters. The
/// same input yields the same token on every call and across process
/// restarts, which is what makes re-tokenization idempotent. This is a
/// stable pseudonymization token, not a cryptographic secret.
///
/// Callers must reject empty or whitespace-only plaintext before hashing;
/// the category validators already guarantee that on the service path.
pub fn digest_token(plaintext: &str) -> String {
    let digest = md5::compute(plaintext.as_bytes());
    format!("{:x}", digest)
}
