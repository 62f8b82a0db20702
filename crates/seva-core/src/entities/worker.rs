use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::WorkerStatus;

/// A municipal field worker.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    /// Free text, e.g. `Water`, `Electricity`, `Roads`, `Sanitation`.
    pub department: String,
    pub status: WorkerStatus,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when adding a worker.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default = "default_worker_status")]
    pub status: WorkerStatus,
    #[serde(default)]
    pub phone: String,
}

const fn default_worker_status() -> WorkerStatus {
    WorkerStatus::Free
}
