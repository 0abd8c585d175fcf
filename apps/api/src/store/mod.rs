//! Record Store Client — owner-scoped CRUD over résumé records.
//!
//! `AppState` holds an `Arc<dyn RecordStore>`: `PgRecordStore` when a database
//! is configured, `MemoryRecordStore` otherwise.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{ResumeFields, ResumeRecord};

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unknown id, or an id that belongs to another owner.
    #[error("Resume {id} not found")]
    NotFound { id: Uuid },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Every operation takes the owner so no caller can reach another owner's record.
/// Failures are returned as-is; nothing here retries.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All of the owner's records, most recently updated first.
    async fn list(&self, owner: Uuid) -> Result<Vec<ResumeRecord>, StoreError>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<ResumeRecord, StoreError>;

    /// Inserts a record. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, owner: Uuid, fields: ResumeFields) -> Result<ResumeRecord, StoreError>;

    /// Overwrites every writable field and refreshes `updated_at`.
    async fn update(&self, owner: Uuid, id: Uuid, fields: ResumeFields) -> Result<(), StoreError>;

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError>;
}
