// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::wait::DEFAULT_TIMEOUT_SECS;
use anyhow::{Context, Result};
use std::env;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace used when no --namespace flag is given
    pub namespace: Option<String>,
    /// Seconds to wait for readiness when no --wait-timeout flag is given
    pub wait_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            namespace: None,
            wait_timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let namespace = env::var("KN_NAMESPACE").ok().filter(|ns| !ns.is_empty());
        let wait_timeout = match env::var("KN_WAIT_TIMEOUT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("KN_WAIT_TIMEOUT is not a number of seconds: {}", value))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            namespace,
            wait_timeout,
        })
    }
}
