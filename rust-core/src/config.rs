use crate::principal::{BlockHeight, Principal};
use crate::state::RegistryState;
use crate::validation::ValidationContext;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Bound into every call signature; envelopes signed for another chain fail.
    pub chain_id: String,
    /// Hex principal holding the admin role at start.
    pub admin: Principal,
    /// Clock reading before the first call; calls below it are rejected.
    #[serde(default = "default_start_height")]
    pub start_height: BlockHeight,
}

fn default_start_height() -> BlockHeight {
    0
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read genesis {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse genesis: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GenesisConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }
}

impl RegistryState {
    pub fn from_genesis(genesis: &GenesisConfig) -> Self {
        tracing::info!(
            chain_id = %genesis.chain_id,
            admin = %genesis.admin,
            "registry state initialised"
        );
        RegistryState::new(genesis.admin)
    }
}

impl ValidationContext {
    pub fn from_genesis(genesis: &GenesisConfig) -> Self {
        ValidationContext::new(genesis.chain_id.clone(), genesis.start_height)
    }
}
