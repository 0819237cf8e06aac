// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace resolution

use crate::config::Config;
use tracing::debug;

/// Pick the namespace to operate in: explicit flag, then configuration, then the kubeconfig default
pub fn resolve_namespace(explicit: Option<&str>, config: &Config, kube_default: &str) -> String {
    let namespace = explicit
        .filter(|ns| !ns.is_empty())
        .or(config.namespace.as_deref())
        .unwrap_or(kube_default)
        .to_string();
    debug!("Using namespace {}", namespace);
    namespace
}
