//! TRUE_TRUST emulator chain: block identity.
//!
//! - core: `Identifier`, zero sentinel, injectable `BlockHasher` (SHA3-256 default)
//! - encoding: frozen canonical byte layout fed to the hash
//! - block: immutable `Block` record, `id()`, genesis, linkage checks
//! - chain: explicit `ChainState`, whole-chain verification, in-memory `ChainStore`
//! - config: JSON emulator config
//! - commands: bodies of the CLI commands

#![forbid(unsafe_code)]

pub mod block;
pub mod chain;
pub mod commands;
pub mod config;
pub mod core;
pub mod encoding;

pub use block::{genesis_block, Block, BlockHeader};
pub use chain::{verify_chain, verify_chain_with, AcceptResult, ChainError, ChainState, ChainStore};
pub use config::EmulatorConfig;
pub use core::{
    hash_to_id, BlockHasher, Hash32, HashAlgorithm, IdError, Identifier, Sha3_256Hasher,
    Shake256Hasher, ZERO_ID,
};
pub use encoding::{decode_block, encode_block, EncodingError};
