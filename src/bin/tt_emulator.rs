//! TT emulator CLI: genesis, block IDs, canonical encodings, chain simulation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use tt_emulator::commands::{self, SimulateParams};
use tt_emulator::{Block, EmulatorConfig, HashAlgorithm, Identifier};

#[derive(Parser, Debug)]
#[command(name = "tt_emulator", version, author)]
#[command(about = "TT emulator chain - content-derived block identity")]
struct Cli {
    /// Config file (JSON)
    #[arg(long, global = true, default_value = "./tt_emulator.json")]
    config: PathBuf,

    /// Override the block-ID hash
    #[arg(long, global = true, value_enum)]
    hash: Option<HashAlgorithm>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct BlockArgs {
    #[arg(long)]
    height: u64,

    /// Parent block ID (hex)
    #[arg(long)]
    parent: Identifier,

    /// Transaction ID (hex), repeat in block order
    #[arg(long = "tx")]
    txs: Vec<Identifier>,
}

impl BlockArgs {
    fn into_block(self) -> Block {
        Block::new(self.height, self.parent, self.txs)
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the genesis header
    Genesis,

    /// Compute a block ID
    Id(BlockArgs),

    /// Print the canonical encoding (hex)
    Encode(BlockArgs),

    /// Build a chain of random blocks and verify it
    Simulate {
        #[arg(long, default_value_t = 10)]
        blocks: u64,

        #[arg(long, default_value_t = 3)]
        txs_per_block: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(default_filter: &str) {
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = EmulatorConfig::load(&cli.config).context("loading emulator config")?;
    if let Some(h) = cli.hash {
        cfg.hash_algorithm = h;
    }
    init_tracing(&cfg.log_filter);
    let algorithm = cfg.hash_algorithm;

    match cli.cmd {
        Cmd::Genesis => {
            let header = commands::genesis_header(algorithm);
            println!("{}", serde_json::to_string_pretty(&header)?);
        }
        Cmd::Id(args) => {
            println!("{}", commands::block_id(&args.into_block(), algorithm));
        }
        Cmd::Encode(args) => {
            println!("{}", commands::encode_hex(&args.into_block()));
        }
        Cmd::Simulate { blocks, txs_per_block, seed } => {
            let params = SimulateParams { blocks, txs_per_block, seed };
            let report = commands::simulate(params, algorithm).context("simulating chain")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
