//! Provider configuration: seeds and scales.
//!
//! A seed is the only externally supplied state a provider has. It is a
//! fixed-length list of 32-bit words whose length is the key size of the
//! ChaCha engine in [`crate::distributions`]. Scales shape the random
//! distributions and are ignored by the exhaustive provider.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{GenerationError, Result};

/// Number of 32-bit words in a seed.
pub const SEED_SIZE: usize = 8;

/// Number of bytes in a seed.
pub const SEED_BYTES: usize = SEED_SIZE * 4;

/// Default expected magnitude of generated numbers.
pub const DEFAULT_SCALE: u32 = 32;

/// Default expected size of generated collections.
pub const DEFAULT_SECONDARY_SCALE: u32 = 8;

/// Seed used by `RandomProvider::example()`.
pub const EXAMPLE_SEED: [u32; SEED_SIZE] = [
    0x5bd1_e995, 0x9e37_79b9, 0x85eb_ca6b, 0xc2b2_ae35,
    0x27d4_eb2f, 0x1656_67b1, 0xd3a2_646c, 0xfd70_46c5,
];

/// Seed for the pseudorandom engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed([u32; SEED_SIZE]);

impl Seed {
    /// Builds a seed from exactly `SEED_SIZE` words.
    pub fn new(words: &[u32]) -> Result<Self> {
        let words: [u32; SEED_SIZE] =
            words
                .try_into()
                .map_err(|_| GenerationError::InvalidSeedLength {
                    expected: SEED_SIZE,
                    actual: words.len(),
                })?;
        Ok(Seed(words))
    }

    pub fn example() -> Self {
        Seed(EXAMPLE_SEED)
    }

    /// Derives a seed from a label, so a test can name its seed instead of
    /// spelling out the words.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(label.as_bytes());
        let digest: [u8; SEED_BYTES] = hasher.finalize().into();
        Seed::from_bytes(digest)
    }

    /// Draws a fresh seed from the operating system.
    ///
    /// This is the only nondeterministic entry point of the crate. Report the
    /// resulting seed to make a run reproducible.
    pub fn from_entropy() -> Self {
        let mut bytes = [0u8; SEED_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Seed::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; SEED_BYTES]) -> Self {
        let mut words = [0u32; SEED_SIZE];
        LittleEndian::read_u32_into(&bytes, &mut words);
        Seed(words)
    }

    pub fn to_bytes(&self) -> [u8; SEED_BYTES] {
        let mut bytes = [0u8; SEED_BYTES];
        LittleEndian::write_u32_into(&self.0, &mut bytes);
        bytes
    }

    pub fn words(&self) -> &[u32; SEED_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes: [u8; SEED_BYTES] = hex::decode(hex_str)
            .map_err(|e| GenerationError::InvalidSeedHex(e.to_string()))?
            .try_into()
            .map_err(|bytes: Vec<u8>| {
                GenerationError::InvalidSeedHex(format!(
                    "expected {} bytes, got {}",
                    SEED_BYTES,
                    bytes.len()
                ))
            })?;
        Ok(Seed::from_bytes(bytes))
    }
}

impl TryFrom<&[u32]> for Seed {
    type Error = GenerationError;

    fn try_from(words: &[u32]) -> Result<Self> {
        Seed::new(words)
    }
}

impl From<[u32; SEED_SIZE]> for Seed {
    fn from(words: [u32; SEED_SIZE]) -> Self {
        Seed(words)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Distribution parameters for the random provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Expected magnitude of unbounded numbers (bit length of big integers,
    /// geometric integers)
    pub scale: u32,

    /// Expected size of collections and decimal precision, independent of
    /// numeric magnitude
    pub secondary_scale: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            secondary_scale: DEFAULT_SECONDARY_SCALE,
        }
    }
}
