use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to read keypair file '{0}': {1}")]
    KeypairFileError(String, String),

    #[error("Invalid RPC url or cluster name: {0}")]
    InvalidCluster(String),
}
