#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, ReplicaSet, ReplicaSetSpec};
use k8s_openapi::api::core::v1::{Pod, PodStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::Resource;
use podview::{BoxError, ListApi, ListQuery, Listable};
use serde::Serialize;
use serde_json::Value;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory cluster answering list calls the way the API server would for the
/// fields used here: namespace scope plus `a.b=value` field selectors.
#[derive(Default)]
pub struct FakeCluster {
    objects: HashMap<String, Vec<Value>>,
    fail_on: Option<&'static str>,
    hang_on: Option<&'static str>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, ListQuery)>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Listable + Serialize>(self, obj: K) -> Self {
        let value = serde_json::to_value(&obj).expect("fixture serializes");
        self.with_value(&K::kind(&()), value)
    }

    pub fn with_value(mut self, kind: &str, value: Value) -> Self {
        self.objects.entry(kind.to_string()).or_default().push(value);
        self
    }

    /// List calls for `kind` return an error.
    pub fn failing_on(mut self, kind: &'static str) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// List calls for `kind` never complete.
    pub fn hanging_on(mut self, kind: &'static str) -> Self {
        self.hang_on = Some(kind);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, ListQuery)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_for(&self, kind: &str) -> Option<ListQuery> {
        self.queries()
            .into_iter()
            .find(|(k, _)| k == kind)
            .map(|(_, q)| q)
    }
}

#[async_trait]
impl ListApi for FakeCluster {
    async fn list<K: Listable>(&self, query: &ListQuery) -> Result<Vec<K>, BoxError> {
        let kind = K::kind(&()).to_string();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap()
            .push((kind.clone(), query.clone()));

        if self.fail_on == Some(kind.as_str()) {
            return Err(format!("listing {kind} failed: connection refused").into());
        }
        if self.hang_on == Some(kind.as_str()) {
            std::future::pending::<()>().await;
        }

        self.objects
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|v| in_namespace(v, query.namespace.as_deref()))
            .filter(|v| matches_fields(v, query.field_selector.as_deref()))
            .map(|v| serde_json::from_value::<K>(v.clone()).map_err(|e| Box::new(e) as BoxError))
            .collect()
    }
}

fn in_namespace(obj: &Value, namespace: Option<&str>) -> bool {
    let Some(ns) = namespace else { return true };
    let own = obj
        .pointer("/metadata/namespace")
        .and_then(Value::as_str)
        .unwrap_or("default");
    own == ns
}

fn matches_fields(obj: &Value, selector: Option<&str>) -> bool {
    let Some(selector) = selector else { return true };
    selector.split(',').all(|term| {
        let (path, want) = term
            .split_once("==")
            .or_else(|| term.split_once('='))
            .expect("field selector term has the form path=value");
        let pointer = format!("/{}", path.trim().replace('.', "/"));
        match obj.pointer(&pointer) {
            Some(Value::String(s)) => s == want.trim(),
            Some(Value::Number(n)) => n.to_string() == want.trim(),
            _ => false,
        }
    })
}

pub fn deployment(name: &str, namespace: Option<&str>, replicas: i32) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: namespace.map(Into::into),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn owned_by(kind: &str, name: &str) -> Option<Vec<OwnerReference>> {
    Some(vec![OwnerReference {
        api_version: "apps/v1".into(),
        kind: kind.into(),
        name: name.into(),
        uid: format!("uid-{name}"),
        controller: Some(true),
        ..Default::default()
    }])
}

pub fn replica_set(name: &str, namespace: &str, owner: &str, replicas: i32) -> ReplicaSet {
    ReplicaSet {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            owner_references: owned_by("Deployment", owner),
            ..Default::default()
        },
        spec: Some(ReplicaSetSpec {
            replicas: Some(replicas),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn pod(name: &str, namespace: &str, owner: &str, phase: &str, message: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            owner_references: owned_by("ReplicaSet", owner),
            ..Default::default()
        },
        status: Some(PodStatus {
            phase: Some(phase.into()),
            message: (!message.is_empty()).then(|| message.into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Deployment `api` in `prod` with an old and a new replicaset; `p3` belongs to the
/// old generation.
pub fn rollout_fixture() -> FakeCluster {
    FakeCluster::new()
        .with(deployment("api", Some("prod"), 2))
        .with(replica_set("rc-old", "prod", "api", 0))
        .with(replica_set("rc-new", "prod", "api", 2))
        .with(pod("p1", "prod", "rc-new", "Running", ""))
        .with(pod("p2", "prod", "rc-new", "Failed", "OOM"))
        .with(pod("p3", "prod", "rc-old", "Running", ""))
}

pub fn sorted_names(list: &podview::PodList) -> Vec<String> {
    let mut names: Vec<String> = list.names().map(String::from).collect();
    names.sort();
    names
}
