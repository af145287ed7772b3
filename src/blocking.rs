//! Blocking wrapper around [`crate::PodView`].
//!
//! Each call blocks the current thread on the given runtime until the pipeline
//! finishes. Do not call these from inside an async task of that runtime; use the
//! async [`crate::PodView`] there instead.

use std::time::Duration;

use k8s_openapi::api::apps::v1::ReplicaSet;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::k8s::ListApi;
use crate::models::{DeploymentInfo, PodList};

#[derive(Debug, Clone)]
pub struct PodView<L> {
    runtime: Handle,
    inner: crate::PodView<L>,
}

impl<L: ListApi> PodView<L> {
    /// `runtime` must be the runtime the lister's I/O is driven by. For a
    /// `kube::Client` that is the multi-threaded runtime it was created on.
    pub fn new(
        runtime: Handle,
        lister: L,
        deployment_name: impl Into<String>,
        deployment_namespace: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            inner: crate::PodView::new(lister, deployment_name, deployment_namespace),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.inner = self.inner.with_cancellation(token);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    pub fn validate_deployment(&self) -> Result<DeploymentInfo> {
        self.runtime.block_on(self.inner.validate_deployment())
    }

    pub fn active_replica_set(&self, deployment: &DeploymentInfo) -> Result<ReplicaSet> {
        self.runtime
            .block_on(self.inner.active_replica_set(deployment))
    }

    pub fn get_pods(&self) -> Result<PodList> {
        self.runtime.block_on(self.inner.get_pods())
    }

    pub fn get_pods_with_phase(&self, phase: &str) -> Result<PodList> {
        self.runtime.block_on(self.inner.get_pods_with_phase(phase))
    }
}
