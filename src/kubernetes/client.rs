// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Serving client used by the service commands

use crate::error::Result;
use crate::kubernetes::wait::wait_for_ready;
use crate::types::Service;
use async_trait::async_trait;
use kube::{api::PostParams, Api, Client, ResourceExt};
use std::time::Duration;
use tracing::{debug, instrument};

/// Progress callback invoked with the elapsed time and the latest readiness message
pub type MessageCallback<'a> = dyn FnMut(Duration, &str) + Send + 'a;

/// Operations on Knative services within a single namespace.
///
/// Errors from `get_service` must classify as `ErrorKind::NotFound` when the
/// service is absent, and errors from `update_service` as `ErrorKind::Conflict`
/// when the resource version is stale.
#[async_trait]
pub trait ServingClient: Send + Sync {
    fn namespace(&self) -> &str;

    async fn get_service(&self, name: &str) -> Result<Service>;

    async fn create_service(&self, service: &Service) -> Result<Service>;

    async fn update_service(&self, service: &Service) -> Result<Service>;

    /// Block until the service is ready, failed, gone, or `timeout` has passed.
    /// Returns the time spent waiting.
    async fn wait_for_service(
        &self,
        name: &str,
        timeout: Duration,
        on_message: &mut MessageCallback<'_>,
    ) -> Result<Duration>;
}

/// `ServingClient` backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeServingClient {
    api: Api<Service>,
    namespace: String,
}

impl KubeServingClient {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

#[async_trait]
impl ServingClient for KubeServingClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn get_service(&self, name: &str) -> Result<Service> {
        Ok(self.api.get(name).await?)
    }

    #[instrument(skip(self, service), fields(namespace = %self.namespace, service = %service.name_any()))]
    async fn create_service(&self, service: &Service) -> Result<Service> {
        let created = self.api.create(&PostParams::default(), service).await?;
        debug!(
            "Created service with resource version {:?}",
            created.metadata.resource_version
        );
        Ok(created)
    }

    #[instrument(skip(self, service), fields(namespace = %self.namespace, service = %service.name_any()))]
    async fn update_service(&self, service: &Service) -> Result<Service> {
        let updated = self
            .api
            .replace(&service.name_any(), &PostParams::default(), service)
            .await?;
        debug!(
            "Updated service from resource version {:?} to {:?}",
            service.metadata.resource_version, updated.metadata.resource_version
        );
        Ok(updated)
    }

    async fn wait_for_service(
        &self,
        name: &str,
        timeout: Duration,
        on_message: &mut MessageCallback<'_>,
    ) -> Result<Duration> {
        wait_for_ready(&self.api, name, timeout, on_message).await
    }
}
