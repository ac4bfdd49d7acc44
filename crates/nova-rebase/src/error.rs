use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("invalid internal type name: {0:?}")]
    InvalidTypeName(String),
    #[error("invalid rebase suffix: {0:?}")]
    InvalidRebaseSuffix(String),
    #[error("method {method} is already registered for rebasing on {owner}")]
    DuplicateRebase { owner: String, method: String },
    #[error("method {method} is declared on {declared_on}, not on {owner}")]
    ForeignMethod {
        owner: String,
        method: String,
        declared_on: String,
    },
    #[error("failed to parse rebase config: {0}")]
    Config(#[from] toml::de::Error),
}
