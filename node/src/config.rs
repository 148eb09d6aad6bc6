//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use armor_hashing::{ContrastFaceDetector, ImageHasher};
use armor_registry::RetryPolicy;

use crate::{LogFormat, NodeError};

/// Configuration for a CreativeArmor node.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for the LMDB store and the wallet key.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. `"info"` or `"debug,armor_registry=trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Remote ledger base URL. The node's own store is the ledger when unset.
    #[serde(default)]
    pub ledger_url: Option<String>,

    /// Per-attempt timeout for ledger calls.
    #[serde(default = "default_ledger_timeout_ms")]
    pub ledger_timeout_ms: u64,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Base of the transaction links printed on certificates.
    #[serde(default = "default_explorer_base_url")]
    pub explorer_base_url: String,

    #[serde(default)]
    pub detector: DetectorConfig,

    /// Hex-encoded wallet seed. Defaults to `{data_dir}/wallet.key`.
    #[serde(default)]
    pub wallet_key_file: Option<PathBuf>,

    #[serde(default)]
    pub enable_metrics: bool,
}

/// Text generation for takedown notices. Notices come from the template
/// when `endpoint` is unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: Option<String>,
    pub model: String,
    /// Environment variable holding the bearer API key.
    pub api_key_env: String,
    pub timeout_ms: u64,
    /// Shortest generated notice accepted.
    pub min_notice_len: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "notice-writer".to_string(),
            api_key_env: "ARMOR_GENERATOR_API_KEY".to_string(),
            timeout_ms: 20_000,
            min_notice_len: armor_defense::DEFAULT_MIN_NOTICE_LEN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub min_contrast: u8,
    pub min_face_size: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let d = ContrastFaceDetector::default();
        Self {
            min_contrast: d.min_contrast,
            min_face_size: d.min_face_size,
        }
    }
}

impl DetectorConfig {
    /// Image hasher backed by a contrast detector with these thresholds.
    pub fn hasher(&self) -> ImageHasher {
        ImageHasher::new(Arc::new(ContrastFaceDetector::new(
            self.min_contrast,
            self.min_face_size,
        )))
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./armor_data")
}

fn default_true() -> bool {
    true
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ledger_timeout_ms() -> u64 {
    5_000
}

fn default_explorer_base_url() -> String {
    "https://explorer.creativearmor.io".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_timeout_ms)
    }

    pub fn wallet_key_path(&self) -> PathBuf {
        self.wallet_key_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("wallet.key"))
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            enable_rpc: default_true(),
            rpc_port: default_rpc_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            ledger_url: None,
            ledger_timeout_ms: default_ledger_timeout_ms(),
            retry: RetryPolicy::default(),
            generator: GeneratorConfig::default(),
            explorer_base_url: default_explorer_base_url(),
            detector: DetectorConfig::default(),
            wallet_key_file: None,
            enable_metrics: false,
        }
    }
}
