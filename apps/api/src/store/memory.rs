use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::{ResumeFields, ResumeRecord};
use crate::store::{RecordStore, StoreError};

/// In-process store for demo mode and tests. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, ResumeRecord>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Inner {
    /// Strictly increasing timestamps, so list order always reflects write order
    /// even when two writes land within the clock's resolution.
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<ResumeRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<ResumeRecord> = inner
            .records
            .values()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<ResumeRecord, StoreError> {
        let inner = self.inner.read().await;
        inner
            .records
            .get(&id)
            .filter(|r| r.user_id == owner)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn create(&self, owner: Uuid, fields: ResumeFields) -> Result<ResumeRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let stamp = inner.next_stamp();
        let mut record = ResumeRecord {
            id: Uuid::new_v4(),
            user_id: owner,
            created_at: stamp,
            updated_at: stamp,
            ..Default::default()
        };
        record.apply(fields);
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, owner: Uuid, id: Uuid, fields: ResumeFields) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let stamp = inner.next_stamp();
        let record = inner
            .records
            .get_mut(&id)
            .filter(|r| r.user_id == owner)
            .ok_or(StoreError::NotFound { id })?;
        record.apply(fields);
        record.updated_at = stamp;
        Ok(())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner.records.get(&id).is_some_and(|r| r.user_id == owner);
        if !owned {
            return Err(StoreError::NotFound { id });
        }
        inner.records.remove(&id);
        Ok(())
    }
}
