use broker_ai::workflows::leads::{
    LeadId, LeadLogEntry, LeadNotification, LeadRecord, LeadRepository, NotificationError,
    NotificationPublisher, RepositoryError,
};
use broker_ai::workflows::mortgage::ViabilityEvaluator;
use broker_ai::workflows::scoring::LeadScorer;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stateless calculators shared by the mortgage and scoring endpoints.
#[derive(Clone, Default)]
pub(crate) struct EvaluationState {
    pub(crate) evaluator: Arc<ViabilityEvaluator>,
    pub(crate) scorer: Arc<LeadScorer>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
    logs: Arc<Mutex<Vec<LeadLogEntry>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)?;
        self.logs
            .lock()
            .expect("log mutex poisoned")
            .retain(|entry| &entry.lead_id != id);
        Ok(())
    }

    fn list(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<LeadRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        records.truncate(limit);
        Ok(records)
    }

    fn append_log(&self, entry: LeadLogEntry) -> Result<(), RepositoryError> {
        self.logs.lock().expect("log mutex poisoned").push(entry);
        Ok(())
    }

    fn logs(&self, id: &LeadId) -> Result<Vec<LeadLogEntry>, RepositoryError> {
        let guard = self.logs.lock().expect("log mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|entry| &entry.lead_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<LeadNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<LeadNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}
