// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

/// Coarse classification of failures, used to decide between recovery and propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Other,
}

#[derive(Error, Debug)]
pub enum KnError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{reason}: {message}")]
    NotReady { reason: String, message: String },

    #[error("service '{0}' has been deleted while waiting for it to become ready")]
    Deleted(String),

    #[error("timeout: service '{name}' not ready after {seconds} seconds")]
    Timeout { name: String, seconds: u64 },

    #[error("cannot fetch service '{name}' in namespace '{namespace}' for extracting the URL: {source}")]
    UrlFetch {
        name: String,
        namespace: String,
        #[source]
        source: Box<KnError>,
    },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl KnError {
    /// Classify the error by the API status code it carries.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KnError::KubeError(kube::Error::Api(err)) if err.code == 404 => ErrorKind::NotFound,
            KnError::KubeError(kube::Error::Api(err)) if err.code == 409 => ErrorKind::Conflict,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, KnError>;
