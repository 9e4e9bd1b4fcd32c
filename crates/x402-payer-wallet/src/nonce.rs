//! Nonce generation for transfer authorizations.

use alloy_primitives::B256;
use rand::RngCore;

/// Source of 32-byte authorization nonces.
///
/// Uniqueness is probabilistic via entropy, not tracked: a compliant source
/// draws fresh cryptographic randomness per call, and callers never reuse a
/// returned nonce across authorizations. Deterministic implementations belong
/// in tests only.
pub trait NonceSource: Send + Sync {
    fn generate(&self) -> B256;
}

/// Default nonce source backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNonceSource;

impl NonceSource for RandomNonceSource {
    fn generate(&self) -> B256 {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        B256::from(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nonces_do_not_collide() {
        // Birthday-bound check over 10k draws, not a hard guarantee.
        let source = RandomNonceSource;
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(source.generate()));
        }
    }
}
