use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{LeadId, LeadLogEntry, LeadRecord};

/// Storage abstraction for lead records and their history.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    fn delete(&self, id: &LeadId) -> Result<(), RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError>;
    fn append_log(&self, entry: LeadLogEntry) -> Result<(), RepositoryError>;
    /// Newest entries first.
    fn logs(&self, id: &LeadId) -> Result<Vec<LeadLogEntry>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook used to pick WhatsApp or e-mail templates after a study.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNotification {
    pub template: String,
    pub lead_id: LeadId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
