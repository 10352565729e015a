use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::validation::DashboardPatch;

/// Matched/modified counts of a single-record update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// An open, live handle to the backing database.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Round-trip used to confirm the handle is usable.
    async fn ping(&self) -> Result<()>;

    async fn list_dashboards(&self) -> Result<Vec<Document>>;

    async fn update_dashboard(&self, id: ObjectId, patch: &DashboardPatch) -> Result<UpdateOutcome>;

    /// Release server resources. Further calls on this handle may fail.
    async fn close(&self) -> Result<()>;
}

/// Opens handles from a connection string.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self, uri: &str) -> Result<Arc<dyn DashboardStore>>;
}
