//! The list capability the pipeline runs against, and its `kube::Client` implementation.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource, api::ListParams};
use serde::de::DeserializeOwned;

use crate::error::BoxError;

/// A namespaced resource that can be listed, e.g. `Deployment`, `ReplicaSet` or `Pod`.
pub trait Listable:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + DeserializeOwned
    + Debug
    + Send
    + Sync
    + 'static
{
}

impl<K> Listable for K where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static
{
}

/// Scope and server-side filter of a single list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// `None` lists across all namespaces
    pub namespace: Option<String>,
    pub field_selector: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// An empty namespace is treated as cluster-wide.
    #[must_use]
    pub fn namespaced(namespace: &str) -> Self {
        Self {
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            field_selector: None,
        }
    }

    #[must_use]
    pub fn fields(mut self, selector: impl Into<String>) -> Self {
        self.field_selector = Some(selector.into());
        self
    }

    /// The namespace to list in; `None` and `Some("")` both mean cluster-wide.
    fn scope(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    fn params(&self) -> ListParams {
        match &self.field_selector {
            Some(fields) => ListParams::default().fields(fields),
            None => ListParams::default(),
        }
    }
}

/// Read-only list access to the cluster. The resource kind is the type parameter.
#[async_trait]
pub trait ListApi: Send + Sync {
    async fn list<K: Listable>(&self, query: &ListQuery) -> Result<Vec<K>, BoxError>;
}

#[async_trait]
impl ListApi for Client {
    async fn list<K: Listable>(&self, query: &ListQuery) -> Result<Vec<K>, BoxError> {
        let api: Api<K> = match query.scope() {
            Some(ns) => Api::namespaced(self.clone(), ns),
            None => Api::all(self.clone()),
        };
        let list = api.list(&query.params()).await?;
        Ok(list.items)
    }
}

#[async_trait]
impl<T: ListApi> ListApi for Arc<T> {
    async fn list<K: Listable>(&self, query: &ListQuery) -> Result<Vec<K>, BoxError> {
        (**self).list::<K>(query).await
    }
}

#[async_trait]
impl<T: ListApi + ?Sized> ListApi for &T {
    async fn list<K: Listable>(&self, query: &ListQuery) -> Result<Vec<K>, BoxError> {
        (**self).list::<K>(query).await
    }
}
