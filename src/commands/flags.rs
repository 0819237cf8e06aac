// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Flags shared by commands that create or modify services

use crate::constants::wait::DEFAULT_TIMEOUT_SECS;
use std::time::Duration;

/// Flags describing the desired state of a service
#[derive(clap::Args, Clone, Debug)]
pub struct EditFlags {
    /// Image to run
    #[arg(long)]
    pub image: Option<String>,
    /// Environment variable to set. NAME=value; NAME- to remove. Example: `-e KEY1=VALUE1 -e KEY2-`
    #[arg(short, long = "env", value_name = "NAME=VALUE")]
    pub env: Vec<String>,
    /// Port the container listens on
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,
    /// Annotation for the service and its revisions. KEY=value; KEY- to remove
    #[arg(short, long = "annotation", value_name = "KEY=VALUE")]
    pub annotation: Vec<String>,
    /// Label for the service and its revisions. KEY=value; KEY- to remove
    #[arg(short, long = "label", value_name = "KEY=VALUE")]
    pub label: Vec<String>,
    /// CPU request, e.g. 250m
    #[arg(long)]
    pub requests_cpu: Option<String>,
    /// Memory request, e.g. 64Mi
    #[arg(long)]
    pub requests_memory: Option<String>,
    /// CPU limit, e.g. 1000m
    #[arg(long)]
    pub limits_cpu: Option<String>,
    /// Memory limit, e.g. 1024Mi
    #[arg(long)]
    pub limits_memory: Option<String>,
    /// Minimal number of replicas
    #[arg(long)]
    pub min_scale: Option<u32>,
    /// Maximal number of replicas
    #[arg(long)]
    pub max_scale: Option<u32>,
    /// Hard limit of concurrent requests handled by a single replica
    #[arg(long)]
    pub concurrency_limit: Option<u32>,
    /// Service account to run the revision with
    #[arg(long)]
    pub service_account: Option<String>,
    /// Keep the user-specified image so later revisions can be pinned to its digest
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub lock_to_digest: bool,
    /// Replace the service if it already exists
    #[arg(long)]
    pub force: bool,
}

impl Default for EditFlags {
    fn default() -> Self {
        Self {
            image: None,
            env: Vec::new(),
            port: None,
            annotation: Vec::new(),
            label: Vec::new(),
            requests_cpu: None,
            requests_memory: None,
            limits_cpu: None,
            limits_memory: None,
            min_scale: None,
            max_scale: None,
            concurrency_limit: None,
            service_account: None,
            lock_to_digest: true,
            force: false,
        }
    }
}

/// Flags controlling whether and how long to wait for readiness
#[derive(clap::Args, Clone, Debug, Default)]
pub struct WaitFlags {
    /// DEPRECATED: please use --no-wait instead. Do not wait for the service to become ready
    #[arg(long = "async", hide = true)]
    pub async_mode: bool,
    /// Do not wait for the service to become ready
    #[arg(long)]
    pub no_wait: bool,
    /// Seconds to wait before giving up on waiting for the service to be ready
    #[arg(long, alias = "timeout-seconds", value_name = "SECONDS")]
    pub wait_timeout: Option<u64>,
}

impl WaitFlags {
    /// Fill in the timeout from configuration unless given on the command line
    pub fn with_default_timeout(&self, seconds: u64) -> Self {
        Self {
            wait_timeout: Some(self.wait_timeout.unwrap_or(seconds)),
            ..self.clone()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
