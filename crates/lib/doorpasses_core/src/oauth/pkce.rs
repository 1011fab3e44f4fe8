//! PKCE code verifier and challenge handling (RFC 7636).
//!
//! PKCE is optional per flow: codes minted without a challenge exchange
//! without a verifier, but a recorded challenge makes verification
//! mandatory at exchange time.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Verifier length used when the caller has no preference.
pub const DEFAULT_VERIFIER_LENGTH: usize = 64;

/// RFC 7636 bounds on verifier length.
const MIN_VERIFIER_LENGTH: usize = 43;
const MAX_VERIFIER_LENGTH: usize = 128;

/// Code challenge transformation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    #[serde(rename = "S256")]
    S256,
    #[serde(rename = "plain")]
    Plain,
}

impl CodeChallengeMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
            CodeChallengeMethod::Plain => "plain",
        }
    }

    /// Parse the wire name. Returns `None` for unsupported methods.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S256" => Some(CodeChallengeMethod::S256),
            "plain" => Some(CodeChallengeMethod::Plain),
            _ => None,
        }
    }
}

/// Generate a random code verifier of `length` chars, clamped to [43, 128].
pub fn generate_code_verifier(length: usize) -> String {
    let length = length.clamp(MIN_VERIFIER_LENGTH, MAX_VERIFIER_LENGTH);
    rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Compute the challenge for a verifier under the given method.
pub fn code_challenge(verifier: &str, method: CodeChallengeMethod) -> String {
    match method {
        CodeChallengeMethod::S256 => {
            let digest = Sha256::digest(verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(digest)
        }
        CodeChallengeMethod::Plain => verifier.to_string(),
    }
}

/// Verify a presented verifier against a recorded challenge in constant time.
pub fn verify_code_challenge(
    verifier: &str,
    challenge: &str,
    method: CodeChallengeMethod,
) -> bool {
    let computed = code_challenge(verifier, method);
    computed.as_bytes().ct_eq(challenge.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_matches_rfc_7636_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let challenge = code_challenge(verifier, CodeChallengeMethod::S256);
        // RFC 7636 appendix B test vector
        assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn s256_round_trip_verifies() {
        let verifier = generate_code_verifier(DEFAULT_VERIFIER_LENGTH);
        let challenge = code_challenge(&verifier, CodeChallengeMethod::S256);
        assert!(verify_code_challenge(
            &verifier,
            &challenge,
            CodeChallengeMethod::S256
        ));
    }

    #[test]
    fn s256_rejects_single_char_corruption() {
        let verifier = generate_code_verifier(DEFAULT_VERIFIER_LENGTH);
        let challenge = code_challenge(&verifier, CodeChallengeMethod::S256);

        let mut corrupted: Vec<char> = verifier.chars().collect();
        corrupted[0] = if corrupted[0] == 'A' { 'B' } else { 'A' };
        let corrupted: String = corrupted.into_iter().collect();

        assert!(!verify_code_challenge(
            &corrupted,
            &challenge,
            CodeChallengeMethod::S256
        ));
    }

    #[test]
    fn plain_method_compares_verbatim() {
        let verifier = generate_code_verifier(DEFAULT_VERIFIER_LENGTH);
        assert_eq!(
            code_challenge(&verifier, CodeChallengeMethod::Plain),
            verifier
        );
        assert!(verify_code_challenge(
            &verifier,
            &verifier,
            CodeChallengeMethod::Plain
        ));
        assert!(!verify_code_challenge(
            &verifier,
            "something-else",
            CodeChallengeMethod::Plain
        ));
    }

    #[test]
    fn verifier_length_is_clamped_to_rfc_bounds() {
        assert_eq!(generate_code_verifier(10).len(), 43);
        assert_eq!(generate_code_verifier(64).len(), 64);
        assert_eq!(generate_code_verifier(300).len(), 128);
    }

    #[test]
    fn verifier_uses_unreserved_alphabet() {
        let verifier = generate_code_verifier(128);
        assert!(
            verifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "verifier contains non-URL-safe chars: {verifier}"
        );
    }

    #[test]
    fn method_names_round_trip() {
        for method in [CodeChallengeMethod::S256, CodeChallengeMethod::Plain] {
            assert_eq!(CodeChallengeMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(CodeChallengeMethod::parse("s256"), None);
    }
}
