//! Keyed-hash commitments for fair random draws.
//!
//! The host draws a secret in `[0, range)` and a fresh 256-bit key, then
//! publishes `HMAC-SHA256(key, secret)`. Key and secret are revealed only
//! after the external party has locked in its input.

use crate::error::{ConfigurationError, ProtocolError};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("expected 32 bytes"));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(arr)
    }
}

/// Secret HMAC key, revealed after the external input is collected
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(#[serde(with = "hex_bytes")] [u8; 32]);

impl Key {
    /// Create a new random key
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// Create a new random key from the given generator
    pub fn random_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn mac(&self, secret: u32) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.0).expect("HMAC accepts keys of any length");
        mac.update(secret.to_string().as_bytes());
        mac
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Published digest = HMAC-SHA256(key, decimal(secret))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex_bytes")] [u8; 32]);

impl Digest {
    /// Compute the digest binding `secret` under `key`
    pub fn compute(key: &Key, secret: u32) -> Self {
        Self(key.mac(secret).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check that a revealed key and secret reproduce this digest
    pub fn verify(&self, key: &Key, secret: u32) -> bool {
        key.mac(secret).verify_slice(&self.0).is_ok()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A secret draw bound to a published digest.
///
/// Not `Clone`: revealing consumes the commitment, so a key/secret pair is
/// used for exactly one decision.
pub struct Commitment {
    range: u32,
    secret: u32,
    key: Key,
    digest: Digest,
}

impl Commitment {
    /// Draw a fresh secret in `[0, range)` with a fresh key
    pub fn generate(range: u32) -> Result<Self, ConfigurationError> {
        Self::generate_with(range, &mut rand::thread_rng())
    }

    /// Same as [`Commitment::generate`] with an explicit generator
    pub fn generate_with<R: RngCore + CryptoRng>(
        range: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError> {
        if range == 0 {
            return Err(ConfigurationError::InvalidRange);
        }
        let secret = rng.gen_range(0..range);
        let key = Key::random_with(rng);
        let digest = Digest::compute(&key, secret);
        Ok(Self {
            range,
            secret,
            key,
            digest,
        })
    }

    /// The value safe to publish before the external input is collected
    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    #[cfg(test)]
    pub(crate) fn secret(&self) -> u32 {
        self.secret
    }

    /// Give up the key and secret. Only call once the external input is locked in.
    pub fn reveal(self) -> (Key, u32) {
        (self.key, self.secret)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("range", &self.range)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Verify a reveal against a digest published for `range`
pub fn verify(digest: &Digest, range: u32, key: &Key, secret: u32) -> Result<(), ProtocolError> {
    if secret >= range {
        return Err(ProtocolError::SecretOutOfRange { secret, range });
    }
    if !digest.verify(key, secret) {
        return Err(ProtocolError::DigestMismatch { digest: *digest });
    }
    Ok(())
}

/// `(secret + external_input) mod modulus`.
///
/// Uniform over `[0, modulus)` whenever `secret` is, whatever the external
/// party picks.
pub fn combine(secret: u32, external_input: u32, modulus: u32) -> u32 {
    ((secret as u64 + external_input as u64) % modulus as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_commitment_verification() {
        let commitment = Commitment::generate(6).unwrap();
        let digest = commitment.digest();
        let (key, secret) = commitment.reveal();

        assert!(digest.verify(&key, secret));
        assert!(verify(&digest, 6, &key, secret).is_ok());
    }

    #[test]
    fn test_reveal_integrity_for_all_small_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        for range in 1..=64 {
            let commitment = Commitment::generate_with(range, &mut rng).unwrap();
            let digest = commitment.digest();
            let (key, secret) = commitment.reveal();
            assert!(secret < range);
            assert_eq!(Digest::compute(&key, secret), digest);
        }
    }

    #[test]
    fn test_zero_range_rejected() {
        assert_eq!(
            Commitment::generate(0).unwrap_err(),
            ConfigurationError::InvalidRange
        );
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let key = Key::random();
        let digest = Digest::compute(&key, 3);

        assert!(!digest.verify(&key, 4));
        assert_eq!(
            verify(&digest, 6, &key, 4),
            Err(ProtocolError::DigestMismatch { digest })
        );
    }

    #[test]
    fn test_wrong_key_fails_verification() {
        let digest = Digest::compute(&Key::random(), 3);

        assert!(!digest.verify(&Key::random(), 3));
    }

    #[test]
    fn test_secret_outside_range_fails_verification() {
        let key = Key::random();
        let digest = Digest::compute(&key, 7);

        assert_eq!(
            verify(&digest, 6, &key, 7),
            Err(ProtocolError::SecretOutOfRange { secret: 7, range: 6 })
        );
    }

    #[test]
    fn test_digest_matches_reference_hmac() {
        // HMAC-SHA256 of the ASCII string "3" under an all-zero key
        let key = Key::from_bytes([0u8; 32]);
        let expected = {
            let mut mac = HmacSha256::new_from_slice(&[0u8; 32]).unwrap();
            mac.update(b"3");
            let bytes: [u8; 32] = mac.finalize().into_bytes().into();
            bytes
        };
        assert_eq!(Digest::compute(&key, 3).as_bytes(), &expected);
    }

    #[test]
    fn test_fresh_keys_per_commitment() {
        let (key1, _) = Commitment::generate(2).unwrap().reveal();
        let (key2, _) = Commitment::generate(2).unwrap().reveal();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_secret_distribution_is_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 60_000;
        let mut buckets = [0u32; 6];
        for _ in 0..trials {
            let (_, secret) = Commitment::generate_with(6, &mut rng).unwrap().reveal();
            buckets[secret as usize] += 1;
        }

        let expected = trials / 6;
        for count in buckets {
            // ~5 standard deviations
            assert!(count.abs_diff(expected) < 500, "bucket count {count}");
        }
    }

    #[test]
    fn test_combine_example() {
        assert_eq!(combine(3, 4, 6), 1);
        assert_eq!(combine(0, 0, 1), 0);
        assert_eq!(combine(u32::MAX, u32::MAX, 7), ((2 * u32::MAX as u64) % 7) as u32);
    }

    #[test]
    fn test_digest_serializes_as_hex() {
        let digest = Digest::from_bytes([0xab; 32]);
        let json = serde_json::to_string(&digest).unwrap();

        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        assert_eq!(serde_json::from_str::<Digest>(&json).unwrap(), digest);
    }

    #[test]
    fn test_key_debug_hides_most_bytes() {
        let key = Key::from_bytes([0x11; 32]);

        assert_eq!(format!("{:?}", key), "Key(11111111..)");
    }

    proptest! {
        #[test]
        fn prop_combine_is_a_bijection_for_any_input(modulus in 1u32..64, input_seed in any::<u32>()) {
            let input = input_seed % modulus;
            let mut seen = vec![false; modulus as usize];
            for secret in 0..modulus {
                let result = combine(secret, input, modulus);
                prop_assert!(result < modulus);
                prop_assert!(!seen[result as usize]);
                seen[result as usize] = true;
            }
        }
    }
}
