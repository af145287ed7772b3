use std::time::Duration;

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::Pod;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::collector::collect_pods;
use crate::error::{Error, Result};
use crate::k8s::{ListApi, ListQuery, Listable};
use crate::models::{DeploymentInfo, PodList, PodPhase};
use crate::resolver;

/// Resolves the pods of one deployment through its active replicaset.
///
/// Every call re-reads the cluster; nothing is cached between calls. The three list
/// calls of [`get_pods`](Self::get_pods) run one after another, and a cancelled token
/// or an expired timeout aborts whichever one is in flight.
#[derive(Debug, Clone)]
pub struct PodView<L> {
    lister: L,
    deployment_name: String,
    deployment_namespace: String,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl<L: ListApi> PodView<L> {
    /// An empty `deployment_namespace` searches every namespace.
    pub fn new(
        lister: L,
        deployment_name: impl Into<String>,
        deployment_namespace: impl Into<String>,
    ) -> Self {
        Self {
            lister,
            deployment_name: deployment_name.into(),
            deployment_namespace: deployment_namespace.into(),
            cancel: CancellationToken::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Deadline for a whole operation, shared by all of its list calls.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    pub fn deployment_namespace(&self) -> &str {
        &self.deployment_namespace
    }

    /// Checks that the deployment exists and returns its name, namespace and desired
    /// replica count.
    ///
    /// # Errors
    ///
    /// `EmptyArgument` for an empty deployment name, `DeploymentNotFound`, `Upstream`
    /// or `Cancelled`.
    pub async fn validate_deployment(&self) -> Result<DeploymentInfo> {
        self.find_deployment(self.deadline()).await
    }

    /// Returns the replicaset currently materializing `deployment`.
    ///
    /// # Errors
    ///
    /// `ReplicaSetNotFound`, `Upstream` or `Cancelled`.
    pub async fn active_replica_set(&self, deployment: &DeploymentInfo) -> Result<ReplicaSet> {
        self.find_active_replica_set(deployment, self.deadline())
            .await
    }

    /// Lists the pods owned by the deployment's active replicaset. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Any stage error; `PodsNotFound` when the replicaset owns no pods.
    #[instrument(skip_all, fields(deployment = %self.deployment_name, namespace = %self.deployment_namespace))]
    pub async fn get_pods(&self) -> Result<PodList> {
        let deadline = self.deadline();
        let deployment = self.find_deployment(deadline).await?;
        let replica_set = self.find_active_replica_set(&deployment, deadline).await?;

        let rs_name = replica_set.metadata.name.unwrap_or_default();
        let namespace = replica_set
            .metadata
            .namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or(deployment.namespace);

        let items: Vec<Pod> = self
            .list(ListQuery::namespaced(&namespace), deadline)
            .await?;
        let listed = items.len();
        let pods = collect_pods(items, &rs_name);
        debug!(replica_set = %rs_name, listed, owned = pods.len(), "Collected pods");

        if pods.is_empty() {
            return Err(Error::PodsNotFound {
                replica_set: rs_name,
                namespace,
            });
        }
        Ok(PodList::from(pods))
    }

    /// Like [`get_pods`](Self::get_pods), keeping only pods in `phase`. The phase must be
    /// `Running`, `Pending` or `Failed` and is checked before any API call. No pod in
    /// that phase gives an empty list, not an error.
    ///
    /// # Errors
    ///
    /// `InvalidPhase`, or any error of [`get_pods`](Self::get_pods).
    pub async fn get_pods_with_phase(&self, phase: &str) -> Result<PodList> {
        let wanted = phase
            .parse::<PodPhase>()
            .ok()
            .filter(|p| p.is_queryable())
            .ok_or_else(|| Error::InvalidPhase(phase.to_string()))?;

        Ok(self.get_pods().await?.with_phase(wanted))
    }

    async fn find_deployment(&self, deadline: Option<Instant>) -> Result<DeploymentInfo> {
        if self.deployment_name.is_empty() {
            return Err(Error::EmptyArgument("deployment name"));
        }

        let query = ListQuery::namespaced(&self.deployment_namespace)
            .fields(resolver::deployment_selector(&self.deployment_name));
        let items: Vec<Deployment> = self.list(query, deadline).await?;
        debug!(deployment = %self.deployment_name, listed = items.len(), "Listed deployments");

        let deployment = resolver::select_deployment(items, &self.deployment_name).ok_or_else(
            || Error::DeploymentNotFound {
                name: self.deployment_name.clone(),
            },
        )?;
        Ok(resolver::describe(&deployment))
    }

    async fn find_active_replica_set(
        &self,
        deployment: &DeploymentInfo,
        deadline: Option<Instant>,
    ) -> Result<ReplicaSet> {
        let query = ListQuery::namespaced(&deployment.namespace)
            .fields(resolver::replicas_selector(deployment.replicas));
        let items: Vec<ReplicaSet> = self.list(query, deadline).await?;
        debug!(
            deployment = %deployment.name,
            namespace = %deployment.namespace,
            replicas = deployment.replicas,
            listed = items.len(),
            "Listed replicasets"
        );

        resolver::select_active_replica_set(items, deployment).ok_or_else(|| {
            Error::ReplicaSetNotFound {
                deployment: deployment.name.clone(),
                namespace: deployment.namespace.clone(),
            }
        })
    }

    fn deadline(&self) -> Option<Instant> {
        self.timeout.map(|t| Instant::now() + t)
    }

    async fn list<K: Listable>(&self, query: ListQuery, deadline: Option<Instant>) -> Result<Vec<K>> {
        let request = self.lister.list::<K>(&query);
        let bounded = async move {
            let res = match deadline {
                Some(at) => match tokio::time::timeout_at(at, request).await {
                    Ok(res) => res,
                    Err(_) => return Err(Error::Cancelled),
                },
                None => request.await,
            };
            res.map_err(Error::Upstream)
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            res = bounded => res,
        }
    }
}
