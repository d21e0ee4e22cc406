// Challenge-response digest for the device's session login.
//
// An unauthenticated GET /auth returns 401 with `X-Device-Realm` and
// `X-Device-Challenge` headers. The client answers with
//
//     sha256( challenge ":" sha256( login ":" realm ":" password ) )
//
// hex-encoded, so the password itself never crosses the wire.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Header carrying the authentication realm.
pub const REALM_HEADER: &str = "X-Device-Realm";
/// Header carrying the one-time challenge nonce.
pub const CHALLENGE_HEADER: &str = "X-Device-Challenge";

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the login digest for a realm + challenge pair.
pub fn response_digest(
    login: &str,
    password: &SecretString,
    realm: &str,
    challenge: &str,
) -> String {
    let inner = sha256_hex(&format!("{login}:{realm}:{}", password.expose_secret()));
    sha256_hex(&format!("{challenge}:{inner}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let password: SecretString = "hunter2".to_string().into();
        let a = response_digest("admin", &password, "Router", "abc123");
        let b = response_digest("admin", &password, "Router", "abc123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn digest_varies_with_challenge() {
        let password: SecretString = "hunter2".to_string().into();
        let a = response_digest("admin", &password, "Router", "abc123");
        let b = response_digest("admin", &password, "Router", "abc124");
        assert_ne!(a, b);
    }

    #[test]
    fn digest_never_contains_password() {
        let password: SecretString = "plaintext-password".to_string().into();
        let d = response_digest("admin", &password, "Router", "nonce");
        assert!(!d.contains("plaintext"));
    }
}
