use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] armor_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] armor_store_lmdb::LmdbError),

    #[error("wallet key file {path}: {reason}")]
    Wallet { path: String, reason: String },

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("RPC server error: {0}")]
    Rpc(#[from] armor_rpc::RpcError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
