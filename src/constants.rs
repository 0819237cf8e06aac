// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Annotation keys understood by Knative Serving and this client
pub mod annotations {
    /// Set by the serving webhook to the user that created the service
    pub const CREATOR: &str = "serving.knative.dev/creator";
    /// Set by the serving webhook to the user that last modified the service
    pub const UPDATER: &str = "serving.knative.dev/lastModifier";
    /// Image as given by the user, before digest resolution
    pub const USER_IMAGE: &str = "client.knative.dev/user-image";
    pub const MIN_SCALE: &str = "autoscaling.knative.dev/minScale";
    pub const MAX_SCALE: &str = "autoscaling.knative.dev/maxScale";

    /// Annotations that survive a replace of an existing service
    pub const PRESERVED_ON_REPLACE: [&str; 2] = [CREATOR, UPDATER];
}

/// Update retry configuration
pub mod update {
    /// How many times an update is retried after a resource version conflict
    pub const MAX_RETRIES: u32 = 3;
}

/// Readiness wait configuration
pub mod wait {
    /// Default time to wait for a service to become ready, in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
}

