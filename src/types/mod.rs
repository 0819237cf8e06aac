// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Knative Serving resource types.

pub mod service;

pub use service::{Readiness, Service, ServiceSpec, ServiceStatus};
