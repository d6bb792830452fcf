// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplicatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Source secret not found: {0}")]
    SourceNotFound(String),

    #[error("Watch failed: {0}")]
    WatchFailed(String),

    #[error("Watch stream ended: {0}")]
    WatchStreamEnded(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ReplicatorError {
    /// True when the underlying API call answered 404
    pub fn is_not_found(&self) -> bool {
        match self {
            ReplicatorError::KubeError(e) => is_not_found(e),
            ReplicatorError::SourceNotFound(_) => true,
            _ => false,
        }
    }
}

/// Check whether a kube error is a 404 from the API server
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

pub type Result<T> = std::result::Result<T, ReplicatorError>;
