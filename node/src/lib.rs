//! CreativeArmor node.
//!
//! The node is the coordinator that:
//! - Opens the LMDB store and the wallet key
//! - Chooses the ledger backend (its own store or a remote ledger)
//! - Builds the verification engine and the defense services
//! - Serves the HTTP API and Prometheus metrics
//! - Shuts everything down on SIGINT/SIGTERM

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod shutdown;
pub mod wallet;

pub use config::{DetectorConfig, GeneratorConfig, NodeConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::ArmorNode;
pub use shutdown::ShutdownController;
pub use wallet::load_or_create_wallet;
