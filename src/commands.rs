//! Bodies of the `tt_emulator` commands, kept here so they are testable.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::block::{Block, BlockHeader};
use crate::chain::{ChainError, ChainStore};
use crate::core::{HashAlgorithm, Identifier};

/// `genesis`: the genesis header under `algorithm`.
pub fn genesis_header(algorithm: HashAlgorithm) -> BlockHeader {
    Block::genesis().header_with(algorithm.hasher().as_ref())
}

/// `id`: the block's identifier under `algorithm`.
pub fn block_id(block: &Block, algorithm: HashAlgorithm) -> Identifier {
    block.id_with(algorithm.hasher().as_ref())
}

/// `encode`: canonical encoding as lower-case hex.
pub fn encode_hex(block: &Block) -> String {
    hex::encode(block.encode())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulateParams {
    pub blocks: u64,
    pub txs_per_block: usize,
    /// Fixed seed for reproducible transaction IDs; entropy otherwise.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateReport {
    pub hash: String,
    pub blocks: usize,
    pub head: Identifier,
    pub height: u64,
}

fn random_id(rng: &mut StdRng) -> Identifier {
    let mut b = [0u8; 32];
    rng.fill_bytes(&mut b);
    Identifier::new(b)
}

/// `simulate`: commits `params.blocks` blocks of random transaction IDs on a
/// fresh store, re-verifies linkage and reports the head.
pub fn simulate(params: SimulateParams, algorithm: HashAlgorithm) -> Result<SimulateReport, ChainError> {
    let mut rng = match params.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut store = ChainStore::new(algorithm);
    info!(
        blocks = params.blocks,
        txs_per_block = params.txs_per_block,
        hash = store.hasher_name(),
        "simulating chain"
    );

    for _ in 0..params.blocks {
        let txs = (0..params.txs_per_block).map(|_| random_id(&mut rng)).collect();
        store.commit_block(txs)?;
    }
    store.verify()?;

    Ok(SimulateReport {
        hash: store.hasher_name().to_string(),
        blocks: store.len(),
        head: store.head_id(),
        height: store.height(),
    })
}
