//! List the pods that belong to a Deployment.
//!
//! A deployment owns one active replicaset per rollout generation, and that
//! replicaset owns the pods. [`PodView`] walks the chain with three list calls:
//!
//! 1. the deployment, by `metadata.name` (cluster-wide when no namespace is given),
//! 2. the replicaset owned by it whose `spec.replicas` matches the deployment's,
//! 3. the pods in that namespace carrying an owner reference to the replicaset.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let client = kube::Client::try_default().await?;
//! let view = podview::PodView::new(client, "kube-state-metrics", "");
//! for pod in view.get_pods_with_phase("Pending").await? {
//!     println!("{pod}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The [`blocking`] module offers the same operations for synchronous callers.

pub mod blocking;
mod client;
mod collector;
mod error;
pub mod k8s;
mod models;
mod resolver;

pub use client::PodView;
pub use error::{BoxError, Error, ErrorKind, Result};
pub use k8s::{ListApi, ListQuery, Listable};
pub use models::{DeploymentInfo, PodInfo, PodList, PodPhase};
