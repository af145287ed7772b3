use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Lifecycle phase of a pod, as reported in `status.phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodPhase {
    Running,
    Pending,
    Failed,
    Succeeded,
    Unknown,
}

impl PodPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
            Self::Unknown => "Unknown",
        }
    }

    /// Only Running, Pending and Failed may be used as a filter.
    #[must_use]
    pub fn is_queryable(self) -> bool {
        matches!(self, Self::Running | Self::Pending | Self::Failed)
    }
}

impl FromStr for PodPhase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Running" => Ok(Self::Running),
            "Pending" => Ok(Self::Pending),
            "Failed" => Ok(Self::Failed),
            "Succeeded" => Ok(Self::Succeeded),
            "Unknown" => Ok(Self::Unknown),
            other => Err(Error::InvalidPhase(other.to_string())),
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The deployment a pod view is resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
}

/// Compact view of one pod owned by the active replicaset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodInfo {
    pub name: String,
    #[serde(rename = "status")]
    pub phase: String,
    /// Only set for pods in the `Failed` phase
    pub message: String,
}

impl fmt::Display for PodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.phase)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodList {
    pub pods: Vec<PodInfo>,
}

impl PodList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.pods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PodInfo> {
        self.pods.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pods.iter().map(|p| p.name.as_str())
    }

    /// Keeps the pods whose phase equals `phase`. An empty result is not an error.
    #[must_use]
    pub fn with_phase(self, phase: PodPhase) -> Self {
        let pods = self
            .pods
            .into_iter()
            .filter(|p| p.phase == phase.as_str())
            .collect();
        Self { pods }
    }
}

impl From<Vec<PodInfo>> for PodList {
    fn from(pods: Vec<PodInfo>) -> Self {
        Self { pods }
    }
}

impl IntoIterator for PodList {
    type Item = PodInfo;
    type IntoIter = std::vec::IntoIter<PodInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.pods.into_iter()
    }
}

impl<'a> IntoIterator for &'a PodList {
    type Item = &'a PodInfo;
    type IntoIter = std::slice::Iter<'a, PodInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.pods.iter()
    }
}
