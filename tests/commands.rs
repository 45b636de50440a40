//! Integration tests for the emulator CLI commands
//!
//! Each command body lives in `tt_emulator::commands`; these tests drive them
//! directly and check the values the CLI prints.

use tt_emulator::commands::{
    block_id, encode_hex, genesis_header, simulate, SimulateParams, SimulateReport,
};
use tt_emulator::{Block, HashAlgorithm, Identifier, Shake256Hasher, ZERO_ID};

fn params(blocks: u64, seed: u64) -> SimulateParams {
    SimulateParams { blocks, txs_per_block: 2, seed: Some(seed) }
}

/* ===== TEST 1: GENESIS ===== */

#[test]
fn test_genesis_command_header() {
    let header = genesis_header(HashAlgorithm::Sha3_256);
    assert_eq!(header.height, 0);
    assert_eq!(header.parent_id, ZERO_ID);
    assert_eq!(header.id, Block::genesis().id());

    let json = serde_json::to_value(header).expect("header to json");
    assert_eq!(json["height"], 0);
    assert_eq!(json["parent_id"], "0".repeat(64));
    assert_eq!(json["id"], Block::genesis().id().to_hex());
}

#[test]
fn test_genesis_command_follows_hash_choice() {
    let header = genesis_header(HashAlgorithm::Shake256);
    assert_eq!(header.id, Block::genesis().id_with(&Shake256Hasher));
    assert_ne!(header.id, genesis_header(HashAlgorithm::Sha3_256).id);
}

/* ===== TEST 2: ID AND ENCODE ===== */

#[test]
fn test_id_command_matches_block_id() {
    let b = Block::new(3, Identifier::new([1u8; 32]), vec![Identifier::new([2u8; 32])]);
    assert_eq!(block_id(&b, HashAlgorithm::Sha3_256), b.id());
    assert_eq!(block_id(&b, HashAlgorithm::Shake256), b.id_with(&Shake256Hasher));
}

#[test]
fn test_encode_command_prints_canonical_hex() {
    assert_eq!(encode_hex(&Block::genesis()), "0".repeat(96));

    let b = Block::new(1, Identifier::new([0xAB; 32]), vec![Identifier::new([0x01; 32])]);
    let want = format!(
        "{}{}{}{}",
        "0000000000000001",
        "ab".repeat(32),
        "0000000000000001",
        "01".repeat(32)
    );
    assert_eq!(encode_hex(&b), want);
}

/* ===== TEST 3: SIMULATE ===== */

#[test]
fn test_simulate_reports_head() {
    let report = simulate(params(5, 7), HashAlgorithm::Sha3_256).expect("simulation");
    assert_eq!(report.hash, "sha3-256");
    assert_eq!(report.blocks, 6, "genesis plus five committed blocks");
    assert_eq!(report.height, 5);
    assert_ne!(report.head, Block::genesis().id());
}

#[test]
fn test_simulate_is_reproducible_with_seed() {
    let a = simulate(params(4, 42), HashAlgorithm::Sha3_256).unwrap();
    let b = simulate(params(4, 42), HashAlgorithm::Sha3_256).unwrap();
    let c = simulate(params(4, 43), HashAlgorithm::Sha3_256).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.head, c.head);
}

#[test]
fn test_simulate_zero_blocks_stays_at_genesis() {
    let report = simulate(params(0, 1), HashAlgorithm::Shake256).unwrap();
    assert_eq!(report.hash, "shake256");
    assert_eq!(report.blocks, 1);
    assert_eq!(report.height, 0);
    assert_eq!(report.head, Block::genesis().id_with(&Shake256Hasher));
}

#[test]
fn test_simulate_report_json_roundtrip() {
    let report = simulate(params(2, 9), HashAlgorithm::Sha3_256).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: SimulateReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, back);
}
