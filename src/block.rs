#![forbid(unsafe_code)]

//! Emulator block record and its content-derived identity.

use serde::{Deserialize, Serialize};

use crate::chain::ChainError;
use crate::core::{hash_to_id, BlockHasher, Identifier, Sha3_256Hasher, ZERO_ID};
use crate::encoding::encode_block;

/// One sealed unit of chain history. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    height: u64,
    parent_id: Identifier,
    transaction_ids: Vec<Identifier>,
}

/// Summary of a block: its ID plus linkage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub id: Identifier,
    pub parent_id: Identifier,
    pub height: u64,
}

impl Block {
    /// The chain-linkage invariant (`parent_id` equals the ID of the block at
    /// `height - 1`) is the caller's to uphold; see [`Block::extends`].
    pub fn new(height: u64, parent_id: Identifier, transaction_ids: Vec<Identifier>) -> Self {
        Self { height, parent_id, transaction_ids }
    }

    /// The genesis block: height 0, zero parent, no transactions.
    pub fn genesis() -> Self {
        Self::new(0, ZERO_ID, Vec::new())
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn parent_id(&self) -> &Identifier {
        &self.parent_id
    }

    pub fn transaction_ids(&self) -> &[Identifier] {
        &self.transaction_ids
    }

    /// Field-wise equal to [`Block::genesis`].
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.parent_id.is_zero() && self.transaction_ids.is_empty()
    }

    /// Canonical bytes, see [`crate::encoding`].
    pub fn encode(&self) -> Vec<u8> {
        encode_block(self.height, &self.parent_id, &self.transaction_ids)
    }

    /// SHA3-256 over the canonical encoding.
    pub fn id(&self) -> Identifier {
        self.id_with(&Sha3_256Hasher)
    }

    pub fn id_with(&self, hasher: &dyn BlockHasher) -> Identifier {
        hash_to_id(hasher.compute_hash(&self.encode()))
    }

    pub fn header(&self) -> BlockHeader {
        self.header_with(&Sha3_256Hasher)
    }

    pub fn header_with(&self, hasher: &dyn BlockHasher) -> BlockHeader {
        BlockHeader {
            id: self.id_with(hasher),
            parent_id: self.parent_id,
            height: self.height,
        }
    }

    /// True if `self` directly extends `parent`.
    pub fn extends(&self, parent: &Block) -> bool {
        self.verify_extends(parent).is_ok()
    }

    pub fn verify_extends(&self, parent: &Block) -> Result<(), ChainError> {
        self.verify_extends_with(parent, &Sha3_256Hasher)
    }

    pub fn verify_extends_with(&self, parent: &Block, hasher: &dyn BlockHasher) -> Result<(), ChainError> {
        let expected = parent.height.checked_add(1).ok_or(ChainError::HeightOverflow)?;
        if self.height != expected {
            return Err(ChainError::HeightMismatch { expected, got: self.height });
        }
        let parent_id = parent.id_with(hasher);
        if self.parent_id != parent_id {
            return Err(ChainError::ParentMismatch {
                height: self.height,
                expected: parent_id,
                got: self.parent_id,
            });
        }
        Ok(())
    }
}

/// Free-standing alias for [`Block::genesis`].
pub fn genesis_block() -> Block {
    Block::genesis()
}
