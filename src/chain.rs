#![forbid(unsafe_code)]

//! Explicit chain state and a single-writer in-memory chain store.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::core::{BlockHasher, HashAlgorithm, Identifier, Sha3_256Hasher};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain is empty")]
    EmptyChain,

    #[error("first block is not genesis (height {height}, parent {parent_id})")]
    NotGenesis { height: u64, parent_id: Identifier },

    #[error("height mismatch: expected {expected}, got {got}")]
    HeightMismatch { expected: u64, got: u64 },

    #[error("parent mismatch at height {height}: expected {expected}, got {got}")]
    ParentMismatch {
        height: u64,
        expected: Identifier,
        got: Identifier,
    },

    #[error("block height overflow")]
    HeightOverflow,
}

/// Current head plus the height the next block must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainState {
    pub head: Identifier,
    pub next_height: u64,
}

impl ChainState {
    /// State of a fresh chain whose head is the genesis block.
    pub fn genesis() -> Self {
        Self::genesis_with(&Sha3_256Hasher)
    }

    pub fn genesis_with(hasher: &dyn BlockHasher) -> Self {
        Self { head: Block::genesis().id_with(hasher), next_height: 1 }
    }

    fn after(head: Identifier, height: u64) -> Result<Self, ChainError> {
        let next_height = height.checked_add(1).ok_or(ChainError::HeightOverflow)?;
        Ok(Self { head, next_height })
    }

    /// Builds the block extending `self.head` and returns it with the
    /// successor state. `self` is consumed so a stale state cannot be reused.
    pub fn seal(self, transaction_ids: Vec<Identifier>) -> Result<(Block, ChainState), ChainError> {
        self.seal_with(transaction_ids, &Sha3_256Hasher)
    }

    pub fn seal_with(
        self,
        transaction_ids: Vec<Identifier>,
        hasher: &dyn BlockHasher,
    ) -> Result<(Block, ChainState), ChainError> {
        let block = Block::new(self.next_height, self.head, transaction_ids);
        let next = Self::after(block.id_with(hasher), block.height())?;
        Ok((block, next))
    }
}

/// Checks a whole chain: genesis first, then each block extends the previous.
pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainError> {
    verify_chain_with(blocks, &Sha3_256Hasher)
}

/// Same as [`verify_chain`] over any ordered sequence of blocks.
pub fn verify_chain_with<'a, I>(blocks: I, hasher: &dyn BlockHasher) -> Result<(), ChainError>
where
    I: IntoIterator<Item = &'a Block>,
{
    let mut iter = blocks.into_iter();
    let mut prev = iter.next().ok_or(ChainError::EmptyChain)?;
    if !prev.is_genesis() {
        return Err(ChainError::NotGenesis {
            height: prev.height(),
            parent_id: *prev.parent_id(),
        });
    }
    for block in iter {
        block.verify_extends_with(prev, hasher)?;
        prev = block;
    }
    Ok(())
}

/// What happened when a block was offered to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptResult {
    pub id: Identifier,
    pub is_new: bool,
}

/// In-memory chain rooted at genesis. One writer; no forks.
pub struct ChainStore {
    hasher: Box<dyn BlockHasher + Send + Sync>,
    blocks: HashMap<Identifier, Block>,
    by_height: Vec<Identifier>,
    state: ChainState,
}

impl Default for ChainStore {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl ChainStore {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self::with_hasher(algorithm.hasher())
    }

    pub fn with_hasher(hasher: Box<dyn BlockHasher + Send + Sync>) -> Self {
        let state = ChainState::genesis_with(hasher.as_ref());
        debug!(id = %state.head, hash = hasher.name(), "genesis block");

        let mut blocks = HashMap::new();
        blocks.insert(state.head, Block::genesis());
        Self {
            hasher,
            blocks,
            by_height: vec![state.head],
            state,
        }
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn head_id(&self) -> Identifier {
        self.state.head
    }

    /// Height of the current head.
    pub fn height(&self) -> u64 {
        self.state.next_height - 1
    }

    pub fn len(&self) -> usize {
        self.by_height.len()
    }

    /// Always false, since genesis is stored on construction. Kept as the
    /// companion of [`ChainStore::len`].
    pub fn is_empty(&self) -> bool {
        self.by_height.is_empty()
    }

    pub fn has(&self, id: &Identifier) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn get(&self, id: &Identifier) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn get_by_height(&self, height: u64) -> Option<&Block> {
        let idx = usize::try_from(height).ok()?;
        self.by_height.get(idx).and_then(|id| self.blocks.get(id))
    }

    pub fn head(&self) -> &Block {
        &self.blocks[&self.state.head]
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[&self.by_height[0]]
    }

    pub fn id_of(&self, block: &Block) -> Identifier {
        block.id_with(self.hasher.as_ref())
    }

    /// Blocks from genesis to head.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.by_height.iter().map(move |id| &self.blocks[id])
    }

    /// Seals `transaction_ids` into a new block on top of the head.
    /// Fails only with [`ChainError::HeightOverflow`].
    pub fn commit_block(&mut self, transaction_ids: Vec<Identifier>) -> Result<Block, ChainError> {
        let (block, next) = self.state.seal_with(transaction_ids, self.hasher.as_ref())?;
        info!(
            height = block.height(),
            id = %next.head,
            txs = block.transaction_ids().len(),
            "committed block"
        );
        self.insert(next.head, block.clone());
        self.state = next;
        Ok(block)
    }

    /// Accepts an externally built block if it extends the head.
    /// Offering a block already in the store is a no-op.
    pub fn accept_block(&mut self, block: Block) -> Result<AcceptResult, ChainError> {
        let id = self.id_of(&block);
        if self.has(&id) {
            debug!(%id, "block already known");
            return Ok(AcceptResult { id, is_new: false });
        }

        if let Err(e) = block.verify_extends_with(self.head(), self.hasher.as_ref()) {
            warn!(%id, height = block.height(), error = %e, "rejected block");
            return Err(e);
        }

        let next = ChainState::after(id, block.height())?;
        info!(height = block.height(), %id, "accepted block");
        self.insert(id, block);
        self.state = next;
        Ok(AcceptResult { id, is_new: true })
    }

    fn insert(&mut self, id: Identifier, block: Block) {
        self.blocks.insert(id, block);
        self.by_height.push(id);
    }

    /// Re-checks linkage of the whole stored chain.
    pub fn verify(&self) -> Result<(), ChainError> {
        verify_chain_with(self.blocks(), self.hasher.as_ref())
    }
}
