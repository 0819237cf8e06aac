// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Kubernetes API and the serving client.

use crate::error::{KnError, Result};
use crate::kubernetes::client::{MessageCallback, ServingClient};
use crate::types::Service;
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::core::ErrorResponse;
use kube::{Client, ResourceExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl tower::Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("services.serving.knative.dev", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock Knative service JSON response
pub fn service_json(name: &str, resource_version: &str, url: Option<&str>) -> String {
    let mut svc = serde_json::json!({
        "apiVersion": "serving.knative.dev/v1",
        "kind": "Service",
        "metadata": {
            "name": name,
            "namespace": "default",
            "resourceVersion": resource_version
        },
        "spec": {
            "template": {"spec": {"containers": [{"image": "ghcr.io/knative/helloworld-go"}]}}
        }
    });
    if let Some(url) = url {
        svc["status"] = serde_json::json!({"url": url, "latestReadyRevisionName": format!("{}-00001", name)});
    }
    svc.to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 conflict response for a stale resource version
pub fn conflict_json(name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("Operation cannot be fulfilled on services.serving.knative.dev \"{}\": the object has been modified; please apply your changes to the latest version and try again", name),
        "reason": "Conflict",
        "code": 409
    })
    .to_string()
}

/// Build an API error the way the kube client reports a failed request
pub fn api_error(code: u16, reason: &str, message: &str) -> KnError {
    KnError::KubeError(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    }))
}

/// Scripted outcome of `FakeServingClient::wait_for_service`
#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// Becomes ready after the given time, reporting these messages first
    Ready(Duration, Vec<String>),
    /// Never becomes ready
    Timeout,
}

#[derive(Debug, Default)]
struct FakeState {
    services: HashMap<String, Service>,
    next_version: u64,
    conflicts_to_inject: usize,
    get_calls: usize,
    create_calls: usize,
    update_calls: usize,
    wait_calls: usize,
}

/// In-memory serving client.
///
/// Updates are compare-and-swap on the resource version. Injected conflicts
/// simulate a concurrent writer bumping the stored version just before the update.
pub struct FakeServingClient {
    namespace: String,
    state: Mutex<FakeState>,
    wait_outcome: WaitOutcome,
    failing_gets: FailingGets,
}

/// When `FakeServingClient::get_service` answers with a server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingGets {
    Never,
    Always,
    /// Only fetches after a readiness wait, i.e. the URL lookup
    AfterWait,
}

impl FakeServingClient {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            state: Mutex::new(FakeState {
                next_version: 1,
                ..Default::default()
            }),
            wait_outcome: WaitOutcome::Ready(Duration::from_millis(1234), Vec::new()),
            failing_gets: FailingGets::Never,
        }
    }

    /// Seed an existing service, as if created earlier by someone else
    pub fn with_service(self, mut service: Service) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            service.metadata.namespace = Some(self.namespace.clone());
            service.metadata.resource_version = Some(state.next_version.to_string());
            state.next_version += 1;
            state.services.insert(service.name_any(), service);
        }
        self
    }

    pub fn with_conflicts(self, count: usize) -> Self {
        self.state.lock().unwrap().conflicts_to_inject = count;
        self
    }

    pub fn with_wait_outcome(mut self, outcome: WaitOutcome) -> Self {
        self.wait_outcome = outcome;
        self
    }

    pub fn with_failing_gets(mut self, failing_gets: FailingGets) -> Self {
        self.failing_gets = failing_gets;
        self
    }

    pub fn stored(&self, name: &str) -> Option<Service> {
        self.state.lock().unwrap().services.get(name).cloned()
    }

    pub fn get_calls(&self) -> usize {
        self.state.lock().unwrap().get_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }

    pub fn wait_calls(&self) -> usize {
        self.state.lock().unwrap().wait_calls
    }

    fn not_found(name: &str) -> KnError {
        api_error(
            404,
            "NotFound",
            &format!("services.serving.knative.dev \"{}\" not found", name),
        )
    }
}

#[async_trait]
impl ServingClient for FakeServingClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get_service(&self, name: &str) -> Result<Service> {
        let mut state = self.state.lock().unwrap();
        state.get_calls += 1;
        let fails = match self.failing_gets {
            FailingGets::Never => false,
            FailingGets::Always => true,
            FailingGets::AfterWait => state.wait_calls > 0,
        };
        if fails {
            return Err(api_error(500, "InternalError", "etcd cluster is unavailable"));
        }
        state
            .services
            .get(name)
            .cloned()
            .ok_or_else(|| Self::not_found(name))
    }

    async fn create_service(&self, service: &Service) -> Result<Service> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        let name = service.name_any();
        if state.services.contains_key(&name) {
            return Err(api_error(409, "AlreadyExists", "service already exists"));
        }
        let mut created = service.clone();
        created.metadata.resource_version = Some(state.next_version.to_string());
        created.status = Some(crate::types::ServiceStatus {
            url: Some(format!("http://{}.{}.example.com", name, self.namespace)),
            latest_ready_revision_name: Some(format!("{}-00001", name)),
            ..Default::default()
        });
        state.next_version += 1;
        state.services.insert(name, created.clone());
        Ok(created)
    }

    async fn update_service(&self, service: &Service) -> Result<Service> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        let name = service.name_any();
        let next_version = state.next_version;

        if state.conflicts_to_inject > 0 {
            state.conflicts_to_inject -= 1;
            // Another writer got there first
            if let Some(stored) = state.services.get_mut(&name) {
                stored.metadata.resource_version = Some(next_version.to_string());
            }
            state.next_version += 1;
        }

        let Some(stored) = state.services.get(&name) else {
            return Err(Self::not_found(&name));
        };
        if stored.metadata.resource_version != service.metadata.resource_version {
            return Err(api_error(
                409,
                "Conflict",
                "the object has been modified; please apply your changes to the latest version and try again",
            ));
        }

        let mut updated = service.clone();
        updated.status = stored.status.clone();
        updated.metadata.resource_version = Some(state.next_version.to_string());
        state.next_version += 1;
        state.services.insert(name, updated.clone());
        Ok(updated)
    }

    async fn wait_for_service(
        &self,
        name: &str,
        timeout: Duration,
        on_message: &mut MessageCallback<'_>,
    ) -> Result<Duration> {
        self.state.lock().unwrap().wait_calls += 1;
        match &self.wait_outcome {
            WaitOutcome::Ready(elapsed, messages) => {
                for message in messages {
                    on_message(*elapsed / 2, message.as_str());
                }
                Ok(*elapsed)
            }
            WaitOutcome::Timeout => Err(KnError::Timeout {
                name: name.to_string(),
                seconds: timeout.as_secs(),
            }),
        }
    }
}
