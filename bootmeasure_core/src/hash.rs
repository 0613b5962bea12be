//! Digests and the accumulators that produce them.

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use sha2::Digest as _;
use std::fmt;

/// Digest size in bytes (both supported algorithms produce 256-bit digests).
pub const DIGEST_SIZE: usize = 32;

/// Supported hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// SHA-256, the algorithm firmware-side verifiers use.
    #[default]
    Sha256,
    /// BLAKE3 with 256-bit output.
    Blake3,
}

impl Algorithm {
    /// Returns the string representation of the algorithm (for config files).
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Blake3 => "blake3-256",
        }
    }

    /// Parse algorithm from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            "blake3" | "blake3-256" => Ok(Algorithm::Blake3),
            _ => Err(Error::unsupported_algorithm(s)),
        }
    }

    /// Create a fresh accumulator for this algorithm.
    pub fn accumulator(&self) -> AlgorithmAccumulator {
        match self {
            Algorithm::Sha256 => AlgorithmAccumulator::Sha256(sha2::Sha256::new()),
            Algorithm::Blake3 => AlgorithmAccumulator::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incremental hash state fed by the measurement.
///
/// `finalize` consumes the accumulator, so a finalized accumulator can
/// neither absorb more bytes nor be finalized again.
pub trait Accumulator {
    /// Absorb bytes into the hash state.
    fn absorb(&mut self, bytes: &[u8]);

    /// Produce the digest of everything absorbed.
    fn finalize(self) -> Digest
    where
        Self: Sized;
}

/// Accumulator backed by one of the built-in algorithms.
#[derive(Clone)]
pub enum AlgorithmAccumulator {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Accumulator for AlgorithmAccumulator {
    fn absorb(&mut self, bytes: &[u8]) {
        match self {
            AlgorithmAccumulator::Sha256(hasher) => hasher.update(bytes),
            AlgorithmAccumulator::Blake3(hasher) => {
                hasher.update(bytes);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            AlgorithmAccumulator::Sha256(hasher) => {
                let mut digest = [0u8; DIGEST_SIZE];
                digest.copy_from_slice(&hasher.finalize());
                Digest(digest)
            }
            AlgorithmAccumulator::Blake3(hasher) => Digest(*hasher.finalize().as_bytes()),
        }
    }
}

impl fmt::Debug for AlgorithmAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmAccumulator::Sha256(_) => f.write_str("AlgorithmAccumulator(sha256)"),
            AlgorithmAccumulator::Blake3(_) => f.write_str("AlgorithmAccumulator(blake3-256)"),
        }
    }
}

/// A 32-byte digest, laid out exactly as the algorithm emits it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Create a Digest from raw bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }

    /// Create a Digest from a hex string (64 hex characters).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != DIGEST_SIZE * 2 {
            return Err(Error::invalid_digest(format!(
                "Expected {} hex characters, got {}",
                DIGEST_SIZE * 2,
                hex_str.len()
            )));
        }

        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::invalid_digest(format!("Invalid hex: {}", e)))?;

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&bytes);
        Ok(Digest(digest))
    }

    /// Convert to hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
