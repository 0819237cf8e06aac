// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Building, creating and replacing Knative services.

pub mod builder;
pub mod ops;

pub use builder::construct_service;
pub use ops::{
    create_service, replace_service, service_exists, show_url, update_with_retry,
    wait_if_requested, Verbs,
};
