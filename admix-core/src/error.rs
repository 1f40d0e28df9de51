use thiserror::Error;

use admix_contracts::ProviderError;

#[derive(Error, Debug)]
pub enum AdsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("duplicate placement: {0}")]
    DuplicatePlacement(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AdsError>;
