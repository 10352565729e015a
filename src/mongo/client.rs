use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{options::ClientOptions, Client, Collection};

use crate::mongo::store::{Connector, DashboardStore, UpdateOutcome};
use crate::mongo::{crud, query};
use crate::validation::DashboardPatch;

pub const DASHBOARDS: &str = "dashboards";

pub async fn connect(uri: &str, app_name: &str) -> Result<Client> {
    let mut options = ClientOptions::parse(uri)
        .await
        .context("Failed to parse MongoDB connection URI")?;

    options.app_name = Some(app_name.into());

    Client::with_options(options).context("Failed to create MongoDB client with options")
}

pub async fn ping(client: &Client) -> Result<()> {
    client
        .database("admin")
        .run_command(doc! {"ping": 1}, None)
        .await
        .context("Failed to ping MongoDB server - connection test failed")?;
    Ok(())
}

/// Opens real driver connections.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    app_name: String,
    default_database: String,
}

impl MongoConnector {
    pub fn new(app_name: impl Into<String>, default_database: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            default_database: default_database.into(),
        }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    async fn open(&self, uri: &str) -> Result<Arc<dyn DashboardStore>> {
        let client = connect(uri, &self.app_name).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&self.default_database));
        tracing::debug!(database = database.name(), "resolved dashboards database");
        let dashboards = database.collection::<Document>(DASHBOARDS);
        Ok(Arc::new(MongoStore { client, dashboards }))
    }
}

/// A driver client bound to the dashboards collection.
pub struct MongoStore {
    client: Client,
    dashboards: Collection<Document>,
}

#[async_trait]
impl DashboardStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        ping(&self.client).await
    }

    async fn list_dashboards(&self) -> Result<Vec<Document>> {
        Ok(query::find_all(&self.dashboards).await?)
    }

    async fn update_dashboard(&self, id: ObjectId, patch: &DashboardPatch) -> Result<UpdateOutcome> {
        let result = crud::update_one(
            &self.dashboards,
            doc! { "_id": id },
            crud::dashboard_set(patch),
        )
        .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
