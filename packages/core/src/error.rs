use std::path::PathBuf;

use thiserror::Error;

use crate::provider::ResourceError;
use crate::store::StoreError;

/// Unified application error.
///
/// Every failure the binary can hit ends up here so it can be logged once
/// and turned into a non-zero exit code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("{}: {}", .0.summary(), .0)]
    Resource(#[from] ResourceError),

    #[error("State error: {0}")]
    Store(#[from] StoreError),

    #[error("Plan error in {path}: {message}")]
    Plan { path: PathBuf, message: String },

    #[error("{address} is already managed; use update instead")]
    AlreadyManaged { address: String },

    #[error("{address} is not in state")]
    NotManaged { address: String },

    #[error("{address} cannot move to service '{service}'; delete it and create it again")]
    ServiceChanged { address: String, service: String },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}
