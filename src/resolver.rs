//! Locating the target deployment and its active replicaset.
//!
//! The active replicaset is the one owned by the deployment whose desired replica
//! count equals the deployment's. Previous generations are scaled to zero, so the
//! replica count filter excludes them server side.

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::warn;

use crate::models::DeploymentInfo;

pub(crate) const DEFAULT_NAMESPACE: &str = "default";

// Kubernetes defaults spec.replicas to 1 for both kinds.
const DEFAULT_REPLICAS: i32 = 1;

pub(crate) fn deployment_selector(name: &str) -> String {
    format!("metadata.name={name}")
}

pub(crate) fn replicas_selector(replicas: i32) -> String {
    format!("spec.replicas={replicas}")
}

/// True when `meta` lists an owner reference with the given kind and name.
pub(crate) fn is_owned_by(meta: &ObjectMeta, kind: &str, name: &str) -> bool {
    meta.owner_references
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|o| o.kind == kind && o.name == name)
}

/// Picks the deployment called `name`. Several matches can only come from a
/// cluster-wide list; the lowest `(namespace, name)` wins so the choice is stable.
pub(crate) fn select_deployment(items: Vec<Deployment>, name: &str) -> Option<Deployment> {
    let mut found: Vec<Deployment> = items
        .into_iter()
        .filter(|d| d.metadata.name.as_deref() == Some(name))
        .collect();

    if found.len() > 1 {
        warn!(
            deployment = %name,
            matches = found.len(),
            "Deployment name exists in several namespaces, picking the first by namespace"
        );
    }

    found.sort_by(|a, b| {
        (&a.metadata.namespace, &a.metadata.name).cmp(&(&b.metadata.namespace, &b.metadata.name))
    });
    found.into_iter().next()
}

pub(crate) fn describe(deployment: &Deployment) -> DeploymentInfo {
    let namespace = match deployment.metadata.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => DEFAULT_NAMESPACE.to_string(),
    };
    DeploymentInfo {
        name: deployment.metadata.name.clone().unwrap_or_default(),
        namespace,
        replicas: deployment
            .spec
            .as_ref()
            .and_then(|s| s.replicas)
            .unwrap_or(DEFAULT_REPLICAS),
    }
}

fn desired_replicas(rs: &ReplicaSet) -> i32 {
    rs.spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(DEFAULT_REPLICAS)
}

/// Picks the active replicaset of `deployment`. During a rollout two replicasets can
/// briefly match; the newest by creation timestamp wins, ties keep server order.
pub(crate) fn select_active_replica_set(
    items: Vec<ReplicaSet>,
    deployment: &DeploymentInfo,
) -> Option<ReplicaSet> {
    let mut active: Option<ReplicaSet> = None;
    let mut matches = 0usize;

    for rs in items.into_iter().filter(|rs| {
        desired_replicas(rs) == deployment.replicas
            && is_owned_by(&rs.metadata, "Deployment", &deployment.name)
    }) {
        matches += 1;
        active = match active {
            Some(current)
                if rs.metadata.creation_timestamp <= current.metadata.creation_timestamp =>
            {
                Some(current)
            }
            _ => Some(rs),
        };
    }

    if matches > 1 {
        warn!(
            deployment = %deployment.name,
            namespace = %deployment.namespace,
            matches,
            "Several active replicasets, picking the newest"
        );
    }
    active
}
