//! Lead records, viability studies and their history timeline.
//!
//! Storage and outbound notifications are traits so the service can run
//! against the hosted backend in production and in-memory adapters in tests.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    LeadId, LeadLogEntry, LeadRecord, LeadStatus, LeadStatusView, LeadSubmission, LogKind,
    StudyRecord,
};
pub use import::{LeadCsvImporter, LeadImportError};
pub use repository::{
    LeadNotification, LeadRepository, NotificationError, NotificationPublisher, RepositoryError,
};
pub use router::lead_router;
pub use service::{LeadServiceError, LeadStudyService, NOT_VIABLE_TEMPLATE, VIABLE_TEMPLATE};
