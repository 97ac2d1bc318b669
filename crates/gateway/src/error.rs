use node::ContainerId;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The map that should own the node doesn't exist yet.
    #[error("container {0} does not exist")]
    MissingContainer(ContainerId),

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request rejected: {0}")]
    Rejected(String),
}
