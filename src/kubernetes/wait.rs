// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness waiting for Knative services

use crate::error::{KnError, Result};
use crate::kubernetes::client::MessageCallback;
use crate::types::{Readiness, Service};
use futures::StreamExt;
use kube::Api;
use kube_runtime::watcher::{self, watcher, Event};
use kube_runtime::WatchStreamExt;
use std::pin::pin;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Watch a service until its current generation is ready.
///
/// Watch errors are retried with backoff; only deletion, a failed Ready
/// condition or the timeout end the wait. The watch is dropped as soon as `timeout` expires, so nothing keeps
/// polling the API server past the deadline.
#[instrument(skip(api, on_message))]
pub async fn wait_for_ready(
    api: &Api<Service>,
    name: &str,
    timeout: Duration,
    on_message: &mut MessageCallback<'_>,
) -> Result<Duration> {
    let start = Instant::now();

    match tokio::time::timeout(timeout, watch_until_ready(api, name, start, on_message)).await {
        Ok(result) => result.map(|_| start.elapsed()),
        Err(_) => Err(KnError::Timeout {
            name: name.to_string(),
            seconds: timeout.as_secs(),
        }),
    }
}

async fn watch_until_ready(
    api: &Api<Service>,
    name: &str,
    start: Instant,
    on_message: &mut MessageCallback<'_>,
) -> Result<()> {
    let config = watcher::Config::default().fields(&format!("metadata.name={}", name));
    let mut events = pin!(watcher(api.clone(), config).default_backoff());

    while let Some(event) = events.next().await {
        let service = match event {
            Ok(Event::Apply(svc) | Event::InitApply(svc)) => svc,
            Ok(Event::Delete(_)) => return Err(KnError::Deleted(name.to_string())),
            Ok(Event::Init | Event::InitDone) => continue,
            Err(e) => {
                warn!("Watch on service {} failed, retrying: {}", name, e);
                continue;
            }
        };

        if observe(&service, start.elapsed(), on_message)? {
            return Ok(());
        }
    }

    Err(KnError::NotReady {
        reason: "WatchClosed".to_string(),
        message: format!("watch on service '{}' ended before it became ready", name),
    })
}

/// Report progress for one observed state; `Ok(true)` once the service is ready.
fn observe(service: &Service, elapsed: Duration, on_message: &mut MessageCallback<'_>) -> Result<bool> {
    match service.readiness() {
        Readiness::Ready => Ok(true),
        Readiness::InProgress(message) => {
            if let Some(message) = message {
                on_message(elapsed, &message);
            } else {
                debug!("Service not reconciled yet");
            }
            Ok(false)
        }
        Readiness::Failed { reason, message } => {
            if !message.is_empty() {
                on_message(elapsed, &message);
            }
            Err(KnError::NotReady { reason, message })
        }
    }
}
