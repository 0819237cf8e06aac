// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access for Knative services: API client, readiness watch, and namespace resolution.

pub mod client;
pub mod namespaces;
pub mod wait;

pub use client::{KubeServingClient, ServingClient};
pub use namespaces::resolve_namespace;
pub use wait::wait_for_ready;
