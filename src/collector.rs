use k8s_openapi::api::core::v1::Pod;

use crate::models::{PodInfo, PodPhase};
use crate::resolver::is_owned_by;

/// Projects the pods owned by the replicaset `replica_set`, keeping list order.
/// Owner references are not field-selectable, so this runs over the whole namespace.
pub(crate) fn collect_pods(pods: Vec<Pod>, replica_set: &str) -> Vec<PodInfo> {
    pods.into_iter()
        .filter(|p| is_owned_by(&p.metadata, "ReplicaSet", replica_set))
        .map(project)
        .collect()
}

fn project(pod: Pod) -> PodInfo {
    let status = pod.status.unwrap_or_default();
    let phase = status
        .phase
        .unwrap_or_else(|| PodPhase::Unknown.to_string());
    let message = if phase == PodPhase::Failed.as_str() {
        status.message.unwrap_or_default()
    } else {
        String::new()
    };

    PodInfo {
        name: pod.metadata.name.unwrap_or_default(),
        phase,
        message,
    }
}
