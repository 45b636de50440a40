#![forbid(unsafe_code)]

//! Core identity primitives: `Identifier`, the zero sentinel, and the
//! injectable hash capability used to derive block IDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use thiserror::Error;

pub type Hash32 = [u8; 32];

/// Fixed-width identifier naming a block or a transaction.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Identifier(Hash32);

/// All-zero sentinel, used only as the genesis parent.
pub const ZERO_ID: Identifier = Identifier::ZERO;

impl Identifier {
    pub const LEN: usize = 32;
    pub const ZERO: Identifier = Identifier([0u8; 32]);

    pub const fn new(bytes: Hash32) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses 64 hex chars, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(s).map_err(|_| IdError::InvalidHex)?;
        let bytes: Hash32 = raw
            .as_slice()
            .try_into()
            .map_err(|_| IdError::InvalidLength(raw.len()))?;
        Ok(Self(bytes))
    }
}

impl From<Hash32> for Identifier {
    fn from(bytes: Hash32) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.to_hex())
    }
}

// Hex string for JSON, raw 32 bytes for binary formats (the canonical encoding
// depends on the latter: no length prefix).
impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Identifier::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            Hash32::deserialize(deserializer).map(Identifier)
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier is not valid hex")]
    InvalidHex,

    #[error("identifier must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Maps a 32-byte digest onto an identifier, byte for byte.
pub fn hash_to_id(digest: Hash32) -> Identifier {
    Identifier(digest)
}

/// Hash capability used for identifier derivation.
pub trait BlockHasher {
    fn compute_hash(&self, data: &[u8]) -> Hash32;

    fn name(&self) -> &'static str;
}

/// SHA3-256, the default block-ID hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha3_256Hasher;

impl BlockHasher for Sha3_256Hasher {
    fn compute_hash(&self, data: &[u8]) -> Hash32 {
        sha3_256_bytes(data)
    }

    fn name(&self) -> &'static str {
        "sha3-256"
    }
}

/// SHAKE256 truncated to 32 bytes of XOF output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shake256Hasher;

impl BlockHasher for Shake256Hasher {
    fn compute_hash(&self, data: &[u8]) -> Hash32 {
        shake256_bytes(data)
    }

    fn name(&self) -> &'static str {
        "shake256"
    }
}

pub fn sha3_256_bytes(data: &[u8]) -> Hash32 {
    let mut h = Sha3_256::new();
    h.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&h.finalize());
    out
}

pub fn shake256_bytes(data: &[u8]) -> Hash32 {
    use tiny_keccak::{Hasher, Shake};
    let mut sh = Shake::v256();
    sh.update(data);
    let mut out = [0u8; 32];
    sh.finalize(&mut out);
    out
}

/// Hash selection for config files and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum HashAlgorithm {
    #[default]
    #[value(name = "sha3-256")]
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[value(name = "shake256")]
    #[serde(rename = "shake256")]
    Shake256,
}

impl HashAlgorithm {
    pub fn hasher(self) -> Box<dyn BlockHasher + Send + Sync> {
        match self {
            HashAlgorithm::Sha3_256 => Box::new(Sha3_256Hasher),
            HashAlgorithm::Shake256 => Box::new(Shake256Hasher),
        }
    }
}
