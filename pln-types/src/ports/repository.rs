//! Conversion repository port.
//!
//! Adapters (JSON file, SQLite) implement this trait with identical
//! observable CRUD semantics.

use std::sync::Arc;

use crate::domain::{ConversionId, ConversionRecord, StoredConversion};
use crate::error::RepoError;

/// Storage backend for conversion records.
#[async_trait::async_trait]
pub trait ConversionRepository: Send + Sync + 'static {
    /// Stores a new record and returns the id assigned to it.
    ///
    /// Fails with `RepoError::Conflict` if an identical record exists.
    async fn create(&self, record: ConversionRecord) -> Result<ConversionId, RepoError>;

    /// Gets a record by id, `RepoError::NotFound` if absent.
    async fn get(&self, id: ConversionId) -> Result<StoredConversion, RepoError>;

    /// Lists all records ordered by id.
    async fn list(&self) -> Result<Vec<StoredConversion>, RepoError>;

    /// Replaces the record stored under `id`.
    async fn update(&self, id: ConversionId, record: ConversionRecord) -> Result<(), RepoError>;

    /// Removes the record stored under `id`.
    async fn delete(&self, id: ConversionId) -> Result<(), RepoError>;
}

#[async_trait::async_trait]
impl<T: ConversionRepository + ?Sized> ConversionRepository for Arc<T> {
    async fn create(&self, record: ConversionRecord) -> Result<ConversionId, RepoError> {
        (**self).create(record).await
    }

    async fn get(&self, id: ConversionId) -> Result<StoredConversion, RepoError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<StoredConversion>, RepoError> {
        (**self).list().await
    }

    async fn update(&self, id: ConversionId, record: ConversionRecord) -> Result<(), RepoError> {
        (**self).update(id, record).await
    }

    async fn delete(&self, id: ConversionId) -> Result<(), RepoError> {
        (**self).delete(id).await
    }
}
