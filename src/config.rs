//! Emulator configuration (JSON file, CLI flags override).

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::HashAlgorithm;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Hash used to derive block IDs.
    pub hash_algorithm: HashAlgorithm,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            log_filter: "info".into(),
        }
    }
}

impl EmulatorConfig {
    /// Reads `p`; a missing file yields the defaults.
    pub fn load(p: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = p.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let buf = std::fs::read(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = serde_json::from_slice(&buf)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn save(&self, p: impl AsRef<Path>) -> anyhow::Result<()> {
        let buf = serde_json::to_vec_pretty(self)?;
        std::fs::write(p.as_ref(), buf)?;
        Ok(())
    }
}
