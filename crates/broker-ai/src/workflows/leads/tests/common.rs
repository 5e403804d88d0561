use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::leads::domain::{LeadId, LeadLogEntry, LeadRecord, LeadSubmission};
use crate::workflows::leads::repository::{
    LeadNotification, LeadRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use crate::workflows::leads::{lead_router, LeadStudyService};
use crate::workflows::mortgage::{LeadFinancialsForm, ViabilityConfig};

pub(super) fn viable_financials() -> LeadFinancialsForm {
    LeadFinancialsForm {
        tipo_operacion: "habitual".to_string(),
        modalidad_compra: "solo".to_string(),
        edad: "40".to_string(),
        ingresos_netos: "3000".to_string(),
        precio_real: "200.000".to_string(),
        aportacion_real: "60.000".to_string(),
        otras_cuotas: "100".to_string(),
        financiacion_solicitada: String::new(),
        tasa_interes: "2.6".to_string(),
        plazo_anos: "30".to_string(),
    }
}

pub(super) fn high_ltv_financials() -> LeadFinancialsForm {
    LeadFinancialsForm {
        ingresos_netos: "5000".to_string(),
        aportacion_real: "10.000".to_string(),
        otras_cuotas: "0".to_string(),
        ..viable_financials()
    }
}

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        name: "Lucía Martín".to_string(),
        email: Some("lucia@example.com".to_string()),
        phone: Some("+34 600 000 000".to_string()),
        source: Some("landing".to_string()),
        bank_score: Some(720),
        financials: viable_financials(),
    }
}

pub(super) fn build_service() -> (
    LeadStudyService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = LeadStudyService::new(
        repository.clone(),
        notifications.clone(),
        ViabilityConfig::default(),
    );
    (service, repository, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
    pub(super) logs: Arc<Mutex<Vec<LeadLogEntry>>>,
}

impl LeadRepository for MemoryRepository {
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
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &LeadId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().take(limit).cloned().collect())
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
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<LeadNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<LeadNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notification: LeadNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("whatsapp offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl LeadRepository for UnavailableRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &LeadId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_log(&self, _entry: LeadLogEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn logs(&self, _id: &LeadId) -> Result<Vec<LeadLogEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: LeadStudyService<MemoryRepository, MemoryNotifications>,
) -> axum::Router {
    lead_router(Arc::new(service))
}
