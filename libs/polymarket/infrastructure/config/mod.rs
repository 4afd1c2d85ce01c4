//! Merger configuration
//!
//! Credentials come from the environment, optionally loaded from a `.env`
//! file. The file next to the working directory wins over the one in the
//! parent directory, so the merger can share the trading bot's `.env`.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::client::ctf::{POLYGON_CHAIN_ID, POLYGON_RPC_URL};

/// Owner EOA private key
pub const PRIVATE_KEY_VARS: [&str; 2] = ["PK", "PRIVATE_KEY"];
/// Safe (proxy wallet) address
pub const SAFE_ADDRESS_VARS: [&str; 2] = ["BROWSER_ADDRESS", "PROXY_WALLET"];
/// Optional RPC endpoint override
pub const RPC_URL_VAR: &str = "POLYGON_RPC_URL";

const ENV_FILE: &str = ".env";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to load env file {path}: {reason}")]
    EnvFileError { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Pick the env file: `<dir>/.env` if present, otherwise `<dir>/../.env`
///
/// Returns `None` when neither exists.
pub fn resolve_env_path(dir: impl AsRef<Path>) -> Option<PathBuf> {
    let dir = dir.as_ref();
    let local = dir.join(ENV_FILE);
    if local.is_file() {
        return Some(local);
    }
    let parent = dir.join("..").join(ENV_FILE);
    if parent.is_file() {
        return Some(parent);
    }
    None
}

/// Load the resolved env file into the process environment
///
/// Variables already set in the environment are not overridden. A missing
/// file is fine, the process environment alone may be enough.
pub fn load_env_file(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    match resolve_env_path(dir) {
        Some(path) => {
            dotenv::from_path(&path).map_err(|e| ConfigError::EnvFileError {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            debug!("[Config] Loaded env file {}", path.display());
            Ok(Some(path))
        }
        None => {
            debug!("[Config] No .env file found, using process environment");
            Ok(None)
        }
    }
}

/// Everything the merger needs to reach the chain and the Safe
#[derive(Clone)]
pub struct MergerConfig {
    pub private_key: String,
    pub safe_address: Address,
    pub rpc_url: String,
}

impl std::fmt::Debug for MergerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergerConfig")
            .field("private_key", &"<redacted>")
            .field("safe_address", &self.safe_address)
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

impl MergerConfig {
    /// Load `.env` from the working directory (or its parent), then read the environment
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::EnvFileError {
            path: PathBuf::from("."),
            reason: e.to_string(),
        })?;
        load_env_file(&cwd)?;
        let config = Self::from_env()?;
        info!("[Config] Safe wallet: {:?}, RPC: {}", config.safe_address, config.rpc_url);
        Ok(config)
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .find(|value| !value.trim().is_empty())
        };

        let private_key = first_set(&PRIVATE_KEY_VARS)
            .ok_or_else(|| ConfigError::EnvVarMissing(PRIVATE_KEY_VARS.join(" or ")))?;

        let safe_address_raw = first_set(&SAFE_ADDRESS_VARS)
            .ok_or_else(|| ConfigError::EnvVarMissing(SAFE_ADDRESS_VARS.join(" or ")))?;
        let safe_address: Address = safe_address_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(safe_address_raw.clone()))?;

        let rpc_url = first_set(&[RPC_URL_VAR]).unwrap_or_else(|| POLYGON_RPC_URL.to_string());

        let config = Self {
            private_key: private_key.trim().to_string(),
            safe_address,
            rpc_url,
        };
        // Fail at setup time rather than at signing time
        config.wallet()?;
        Ok(config)
    }

    /// Owner wallet bound to Polygon's chain ID
    pub fn wallet(&self) -> Result<LocalWallet> {
        let wallet: LocalWallet = self
            .private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|e: ethers::signers::WalletError| ConfigError::InvalidPrivateKey(e.to_string()))?;
        Ok(wallet.with_chain_id(POLYGON_CHAIN_ID))
    }
}
