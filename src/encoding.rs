#![forbid(unsafe_code)]

//! Canonical block encoding, the only input to block-ID hashing.
//!
//! Layout (frozen; changing it changes every block ID):
//!
//! ```text
//! offset 0   height     u64 big-endian
//! offset 8   parent_id  32 raw bytes
//! offset 40  tx_count   u64 big-endian
//! offset 48  tx_ids     32 raw bytes each, in block order
//! ```

use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::Block;
use crate::core::Identifier;

/// Bytes before the first transaction ID.
pub const HEADER_LEN: usize = 8 + Identifier::LEN + 8;

const TX_COUNT_OFFSET: usize = 8 + Identifier::LEN;

#[derive(Serialize)]
struct CanonicalRef<'a> {
    height: u64,
    parent_id: &'a Identifier,
    transaction_ids: &'a [Identifier],
}

#[derive(Deserialize)]
struct CanonicalOwned {
    height: u64,
    parent_id: Identifier,
    transaction_ids: Vec<Identifier>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("encoded block is truncated: need {need} bytes, got {got}")]
    Truncated { need: usize, got: usize },

    #[error("encoded block has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("malformed block encoding: {0}")]
    Malformed(String),
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
}

/// Length of the encoding of a block carrying `tx_count` transactions.
pub fn encoded_len(tx_count: usize) -> usize {
    HEADER_LEN + tx_count * Identifier::LEN
}

/// Encodes the identity fields of a block.
///
/// Panics only if serialization of plain in-memory values fails, which would
/// be a bug; a wrong identifier is never produced instead.
pub fn encode_block(height: u64, parent_id: &Identifier, transaction_ids: &[Identifier]) -> Vec<u8> {
    let rec = CanonicalRef { height, parent_id, transaction_ids };
    options().serialize(&rec).expect("block->canonical bytes")
}

/// Inverse of [`encode_block`], for verifiers recomputing IDs from bytes.
pub fn decode_block(bytes: &[u8]) -> Result<Block, EncodingError> {
    if bytes.len() < HEADER_LEN {
        return Err(EncodingError::Truncated { need: HEADER_LEN, got: bytes.len() });
    }
    let mut count = [0u8; 8];
    count.copy_from_slice(&bytes[TX_COUNT_OFFSET..HEADER_LEN]);
    let need = usize::try_from(u64::from_be_bytes(count))
        .ok()
        .and_then(|n| n.checked_mul(Identifier::LEN))
        .and_then(|n| n.checked_add(HEADER_LEN))
        .ok_or_else(|| EncodingError::Malformed("transaction count overflows".into()))?;

    if bytes.len() < need {
        return Err(EncodingError::Truncated { need, got: bytes.len() });
    }
    if bytes.len() > need {
        return Err(EncodingError::TrailingBytes(bytes.len() - need));
    }

    let rec: CanonicalOwned = options()
        .deserialize(bytes)
        .map_err(|e| EncodingError::Malformed(e.to_string()))?;
    Ok(Block::new(rec.height, rec.parent_id, rec.transaction_ids))
}
