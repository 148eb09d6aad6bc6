//! CreativeArmor daemon: runs a node, or performs one-shot proof operations
//! against the node's data directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use armor_hashing::SubmittedImage;
use armor_node::{init_logging, ArmorNode, LogFormat, NodeConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "armor-daemon", about = "CreativeArmor proof-of-human-origin node")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "ARMOR_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the proof store and wallet.
    #[arg(long, env = "ARMOR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP API port.
    #[arg(long, env = "ARMOR_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Disable the HTTP API.
    #[arg(long, env = "ARMOR_DISABLE_RPC")]
    no_rpc: bool,

    /// Remote ledger base URL. Without it the node commits to its own store.
    #[arg(long, env = "ARMOR_LEDGER_URL")]
    ledger_url: Option<String>,

    /// Text-generation endpoint for takedown notices.
    #[arg(long, env = "ARMOR_GENERATOR_URL")]
    generator_url: Option<String>,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, env = "ARMOR_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ARMOR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ARMOR_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the node until SIGINT/SIGTERM.
    Run,
    /// Print the node wallet address, creating the wallet if needed.
    Wallet,
    /// Generate a fresh key pair and print its seed and address.
    Keygen,
    /// Print the face, content and watermark hashes of a PNG, JPEG or PGM/PPM image.
    Hash { image: PathBuf },
    /// Register an image with the node wallet.
    Register { image: PathBuf },
    /// Verify an image against the registry.
    Verify { image: PathBuf },
    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => NodeConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if self.no_rpc {
            config.enable_rpc = false;
        }
        if let Some(url) = &self.ledger_url {
            config.ledger_url = Some(url.clone());
        }
        if let Some(url) = &self.generator_url {
            config.generator.endpoint = Some(url.clone());
        }
        config.enable_metrics |= self.metrics;
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

fn load_image(path: &Path) -> anyhow::Result<SubmittedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    SubmittedImage::decode(bytes).with_context(|| format!("decoding {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;

    match &cli.command {
        Command::Keygen => {
            let keypair = armor_crypto::generate_keypair();
            println!("seed:    {}", hex::encode(keypair.private.0));
            println!("address: {}", armor_crypto::derive_address(&keypair.public));
            return Ok(());
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            return Ok(());
        }
        Command::Hash { image } => {
            let hashes = config.detector.hasher().hash_all(&load_image(image)?)?;
            println!("{}", serde_json::to_string_pretty(&hashes)?);
            return Ok(());
        }
        _ => {}
    }

    init_logging(config.log_format, &config.log_level)?;
    let node = ArmorNode::new(config)?;
    let state = node.state();

    match cli.command {
        Command::Run => {
            tracing::info!(
                wallet = %node.wallet_address(),
                data_dir = %node.config.data_dir.display(),
                "starting CreativeArmor node"
            );
            node.run().await?;
            tracing::info!("daemon exited cleanly");
        }
        Command::Wallet => println!("{}", node.wallet_address()),
        Command::Register { image } => {
            let image = load_image(&image)?;
            let record = state
                .engine
                .register(&image, &state.wallet, state.clock.now(), &state.cancel)
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Verify { image } => {
            let result = state.engine.verify(&load_image(&image)?, &state.cancel).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Keygen | Command::Config | Command::Hash { .. } => {}
    }

    Ok(())
}
