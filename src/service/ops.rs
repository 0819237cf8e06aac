// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-replace operations and readiness reporting

use crate::commands::flags::WaitFlags;
use crate::constants::{annotations, update::MAX_RETRIES};
use crate::error::{ErrorKind, KnError, Result};
use crate::kubernetes::ServingClient;
use crate::types::Service;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Present and past tense of the action, used in progress output
#[derive(Debug, Clone, Copy)]
pub struct Verbs {
    pub doing: &'static str,
    pub done: &'static str,
}

impl Verbs {
    pub const CREATE: Verbs = Verbs {
        doing: "Creating",
        done: "created",
    };
    pub const REPLACE: Verbs = Verbs {
        doing: "Replacing",
        done: "replaced",
    };
}

/// Whether a service with this name exists. Absence is not an error.
#[instrument(skip(client))]
pub async fn service_exists<C: ServingClient + ?Sized>(client: &C, name: &str) -> Result<bool> {
    match client.get_service(name).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a new service, then wait for it unless told otherwise
pub async fn create_service<C: ServingClient + ?Sized>(
    client: &C,
    service: &Service,
    wait: &WaitFlags,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    client.create_service(service).await?;
    info!("Created service {}/{}", client.namespace(), service.name_any());
    wait_if_requested(client, service, wait, Verbs::CREATE, out).await
}

/// Replace an existing service, then wait for it unless told otherwise
pub async fn replace_service<C: ServingClient + ?Sized>(
    client: &C,
    service: &mut Service,
    wait: &WaitFlags,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    update_with_retry(client, service).await?;
    info!("Replaced service {}/{}", client.namespace(), service.name_any());
    wait_if_requested(client, service, wait, Verbs::REPLACE, out).await
}

/// Overwrite the existing service with `service`.
///
/// Each attempt re-reads the existing service, carries over the preserved
/// annotations and its resource version, and updates. Conflicts are retried
/// up to `MAX_RETRIES` times; the last conflict is returned as is.
#[instrument(skip(client, service), fields(service = %service.name_any()))]
pub async fn update_with_retry<C: ServingClient + ?Sized>(
    client: &C,
    service: &mut Service,
) -> Result<Service> {
    let name = service.name_any();
    let mut retries = 0;

    loop {
        let existing = client.get_service(&name).await?;

        preserve_annotations(service, &existing);
        service.metadata.resource_version = existing.metadata.resource_version.clone();

        match client.update_service(service).await {
            Ok(updated) => return Ok(updated),
            Err(e) if e.kind() == ErrorKind::Conflict && retries < MAX_RETRIES => {
                retries += 1;
                debug!("Conflict updating service {}, retry {}/{}", name, retries, MAX_RETRIES);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Reset the annotations of `service` to the preserved ones found on `existing`,
/// on top of whatever the edit flags set. Everything else from `existing` is dropped.
fn preserve_annotations(service: &mut Service, existing: &Service) {
    let target = service.metadata.annotations.get_or_insert_with(BTreeMap::new);
    for key in annotations::PRESERVED_ON_REPLACE {
        if let Some(value) = existing.annotations().get(key) {
            target.insert(key.to_string(), value.clone());
        }
    }
}

/// Report the outcome, waiting for readiness unless `--async` or `--no-wait` was given
pub async fn wait_if_requested<C: ServingClient + ?Sized>(
    client: &C,
    service: &Service,
    wait: &WaitFlags,
    verbs: Verbs,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    let name = service.name_any();

    if wait.async_mode {
        write!(
            out,
            "\nWARNING: flag --async is deprecated and going to be removed in future release, please use --no-wait instead.\n\n"
        )?;
        writeln!(out, "Service '{}' {} in namespace '{}'.", name, verbs.done, client.namespace())?;
        return Ok(());
    }
    if wait.no_wait {
        writeln!(out, "Service '{}' {} in namespace '{}'.", name, verbs.done, client.namespace())?;
        return Ok(());
    }

    writeln!(out, "{} service '{}' in namespace '{}':", verbs.doing, name, client.namespace())?;
    wait_for_service_to_get_ready(client, &name, wait.timeout(), verbs.done, out).await
}

async fn wait_for_service_to_get_ready<C: ServingClient + ?Sized>(
    client: &C,
    name: &str,
    timeout: Duration,
    verb_done: &str,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    writeln!(out)?;
    let elapsed = {
        let mut on_message = simple_message_callback(&mut *out);
        client.wait_for_service(name, timeout, &mut on_message).await?
    };
    writeln!(out, "{:7.3}s Ready to serve.", round_to_millis(elapsed))?;
    writeln!(out)?;
    show_url(client, name, None, verb_done, out).await
}

/// Print the URL of the latest ready revision.
///
/// When `original_revision` matches the latest ready revision the output says
/// so instead of naming the action.
pub async fn show_url<C: ServingClient + ?Sized>(
    client: &C,
    name: &str,
    original_revision: Option<&str>,
    verb_done: &str,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    let service = client.get_service(name).await.map_err(|e| KnError::UrlFetch {
        name: name.to_string(),
        namespace: client.namespace().to_string(),
        source: Box::new(e),
    })?;

    let url = service.url().unwrap_or_default();
    if let Err(e) = Url::parse(url) {
        warn!("Service {} reports an invalid URL {:?}: {}", name, url, e);
    }
    let new_revision = service.latest_ready_revision().unwrap_or_default();

    match original_revision {
        Some(original) if !original.is_empty() && original == new_revision => writeln!(
            out,
            "Service '{}' with latest revision '{}' (unchanged) is available at URL:\n{}",
            name, new_revision, url
        )?,
        _ => writeln!(
            out,
            "Service '{}' {} to latest revision '{}' is available at URL:\n{}",
            name, verb_done, new_revision, url
        )?,
    }
    Ok(())
}

/// Progress callback printing each distinct readiness message with its elapsed time
pub fn simple_message_callback<'a>(
    out: &'a mut (dyn Write + Send),
) -> impl FnMut(Duration, &str) + Send + 'a {
    let mut last = String::new();
    move |elapsed, message| {
        if message == last {
            return;
        }
        if let Err(e) = writeln!(out, "{:7.3}s {}", round_to_millis(elapsed), message) {
            warn!("Failed to write progress message: {}", e);
        }
        last = message.to_string();
    }
}

fn round_to_millis(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0).round() / 1000.0
}
