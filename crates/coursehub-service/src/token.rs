//! Share token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use coursehub_core::config::share::ShareConfig;

/// Generates opaque share tokens for invitations and links.
///
/// Guess-resistance is the entire security boundary for redemption, so
/// tokens come from the thread-local CSPRNG and carry the configured
/// number of random bytes (32 by default, 256 bits).
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    token_bytes: usize,
}

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new(config: &ShareConfig) -> Self {
        Self {
            token_bytes: config.token_bytes,
        }
    }

    /// Generates a URL-safe random token.
    pub fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.token_bytes];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> TokenGenerator {
        TokenGenerator::new(&ShareConfig::default())
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generator().generate();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "token contains non-URL-safe characters: {token}"
        );
    }

    #[test]
    fn test_token_length_matches_entropy() {
        // 32 bytes base64-encoded without padding is 43 characters.
        let token = generator().generate();
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn test_tokens_are_unique() {
        let generator = generator();
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
    }
}
