//! Token generation and hashing.
//!
//! Raw token values cross a boundary exactly once, at mint time. The
//! durable store only ever sees SHA-256 hashes, and comparisons against
//! stored hashes are constant-time.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Random bytes per token before base64url encoding.
const TOKEN_BYTES: usize = 32;

/// Random bytes per client identifier.
const CLIENT_ID_BYTES: usize = 16;

/// A freshly minted access/refresh pair, raw values.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Generate a cryptographically random token (base64url, no padding).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hash a token for storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Verify a presented token against a stored hash in constant time.
pub fn verify_token(candidate: &str, stored_hash: &str) -> bool {
    let computed = hash_token(candidate);
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Generate an independent access/refresh token pair.
pub fn generate_token_pair() -> TokenPair {
    TokenPair {
        access_token: generate_token(),
        refresh_token: generate_token(),
    }
}

/// Generate a wire identifier for a dynamically registering OAuth client.
pub fn generate_client_id() -> String {
    let mut bytes = [0u8; CLIENT_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
