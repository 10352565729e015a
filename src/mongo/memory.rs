//! In-process stand-in for a MongoDB deployment, keyed by connection string.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::mongo::crud::dashboard_set;
use crate::mongo::store::{Connector, DashboardStore, UpdateOutcome};
use crate::validation::DashboardPatch;

#[derive(Default)]
pub struct MemoryConnector {
    targets: Mutex<HashMap<String, Arc<MemoryStore>>>,
    unreachable: Mutex<HashSet<String>>,
    opened: AtomicUsize,
}

impl MemoryConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_target(self: &Arc<Self>, uri: &str, records: Vec<Document>) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new(records));
        self.targets
            .lock()
            .unwrap()
            .insert(uri.to_owned(), Arc::clone(&store));
        store
    }

    /// Opening succeeds but the ping fails, like a server that refuses auth.
    pub fn unreachable(self: &Arc<Self>, uri: &str) {
        self.unreachable.lock().unwrap().insert(uri.to_owned());
    }

    pub fn target(&self, uri: &str) -> Option<Arc<MemoryStore>> {
        self.targets.lock().unwrap().get(uri).cloned()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn open(&self, uri: &str) -> Result<Arc<dyn DashboardStore>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let refuse = self.unreachable.lock().unwrap().contains(uri);
        let store = self
            .targets
            .lock()
            .unwrap()
            .entry(uri.to_owned())
            .or_insert_with(|| Arc::new(MemoryStore::new(Vec::new())))
            .clone();
        store.closed.store(false, Ordering::SeqCst);
        store.refuse_ping.store(refuse, Ordering::SeqCst);
        Ok(store)
    }
}

pub struct MemoryStore {
    records: Mutex<Vec<Document>>,
    closed: AtomicBool,
    refuse_ping: AtomicBool,
    fail_next: AtomicBool,
}

impl MemoryStore {
    fn new(records: Vec<Document>) -> Self {
        Self {
            records: Mutex::new(records),
            closed: AtomicBool::new(false),
            refuse_ping: AtomicBool::new(false),
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Make the next list/update call fail as a dropped connection would.
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn insert(&self, record: Document) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<Document> {
        self.records.lock().unwrap().clone()
    }

    fn check_usable(&self) -> Result<()> {
        if self.is_closed() {
            bail!("client has been shut down");
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            bail!("connection reset by peer");
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        if self.refuse_ping.load(Ordering::SeqCst) {
            bail!("Authentication failed.");
        }
        Ok(())
    }

    async fn list_dashboards(&self) -> Result<Vec<Document>> {
        self.check_usable()?;
        Ok(self.records())
    }

    async fn update_dashboard(&self, id: ObjectId, patch: &DashboardPatch) -> Result<UpdateOutcome> {
        self.check_usable()?;
        let update = dashboard_set(patch);
        let set = update
            .get_document("$set")
            .map_err(|e| anyhow!("malformed update: {e}"))?;

        let mut records = self.records.lock().unwrap();
        let Some(record) = records
            .iter_mut()
            .find(|r| r.get("_id") == Some(&Bson::ObjectId(id)))
        else {
            return Ok(UpdateOutcome { matched: 0, modified: 0 });
        };

        let mut changed = false;
        for (key, value) in set {
            if record.get(key) != Some(value) {
                record.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
