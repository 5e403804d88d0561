//! End-to-end lead studies driven through the HTTP router and the CSV importer.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use serde_json::Value;

    use broker_ai::workflows::leads::{
        LeadId, LeadLogEntry, LeadNotification, LeadRecord, LeadRepository, NotificationError,
        NotificationPublisher, RepositoryError,
    };

    #[derive(Default, Clone)]
    pub(super) struct SharedRepository {
        records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
        logs: Arc<Mutex<Vec<LeadLogEntry>>>,
    }

    impl SharedRepository {
        pub(super) fn len(&self) -> usize {
            self.records.lock().expect("repository mutex poisoned").len()
        }
    }

    impl LeadRepository for SharedRepository {
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
            match guard.get_mut(&record.id) {
                Some(existing) => {
                    *existing = record;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
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
    pub(super) struct RecordingNotifications {
        events: Arc<Mutex<Vec<LeadNotification>>>,
    }

    impl RecordingNotifications {
        pub(super) fn templates(&self) -> Vec<String> {
            self.events
                .lock()
                .expect("notification mutex poisoned")
                .iter()
                .map(|event| event.template.clone())
                .collect()
        }
    }

    impl NotificationPublisher for RecordingNotifications {
        fn publish(&self, notification: LeadNotification) -> Result<(), NotificationError> {
            self.events
                .lock()
                .expect("notification mutex poisoned")
                .push(notification);
            Ok(())
        }
    }

    pub(super) fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        }
    }

    pub(super) async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json payload")
    }
}

use std::io::Cursor;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use broker_ai::workflows::leads::{
    lead_router, LeadCsvImporter, LeadStatus, LeadStudyService, NOT_VIABLE_TEMPLATE,
    VIABLE_TEMPLATE,
};
use broker_ai::workflows::mortgage::{OperationStatus, ViabilityConfig};
use common::{json_body, request, RecordingNotifications, SharedRepository};

fn service() -> (
    Arc<LeadStudyService<SharedRepository, RecordingNotifications>>,
    SharedRepository,
    RecordingNotifications,
) {
    let repository = SharedRepository::default();
    let notifications = RecordingNotifications::default();
    let service = LeadStudyService::new(
        Arc::new(repository.clone()),
        Arc::new(notifications.clone()),
        ViabilityConfig::default(),
    );
    (Arc::new(service), repository, notifications)
}

#[tokio::test]
async fn lead_moves_from_viable_to_not_viable_after_financials_change() {
    let (service, repository, notifications) = service();
    let router = lead_router(service);

    let created = router
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/leads",
            Some(json!({
                "name": "Marta Gil",
                "email": "marta@example.com",
                "bank_score": 720,
                "financials": {
                    "tipo_operacion": "habitual",
                    "edad": "40",
                    "ingresos_netos": "3.000",
                    "precio_real": "200.000",
                    "aportacion_real": "60.000",
                    "otras_cuotas": "100",
                    "tasa_interes": "2,6",
                    "plazo_anos": "30"
                }
            })),
        ))
        .await
        .expect("create executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let lead_id = json_body(created).await["lead_id"]
        .as_str()
        .expect("lead id")
        .to_string();

    let study = router
        .clone()
        .oneshot(request("POST", &format!("/api/v1/leads/{lead_id}/study"), None))
        .await
        .expect("study executes");
    assert_eq!(study.status(), StatusCode::OK);
    assert_eq!(json_body(study).await["status"], "VIABLE");

    let updated = router
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/v1/leads/{lead_id}/financials"),
            Some(json!({
                "edad": "40",
                "ingresos_netos": "5.000",
                "precio_real": "200.000",
                "aportacion_real": "10.000",
                "tasa_interes": "2,6",
                "plazo_anos": "30"
            })),
        ))
        .await
        .expect("update executes");
    assert_eq!(updated.status(), StatusCode::OK);

    let restudy = router
        .clone()
        .oneshot(request("POST", &format!("/api/v1/leads/{lead_id}/study"), None))
        .await
        .expect("study executes");
    let restudy = json_body(restudy).await;
    assert_eq!(restudy["status"], "NO_VIABLE");
    assert_eq!(restudy["result"]["requires_manual_review"], true);

    let history = router
        .clone()
        .oneshot(request("GET", &format!("/api/v1/leads/{lead_id}/history"), None))
        .await
        .expect("history executes");
    let history = json_body(history).await;
    let entries = history.as_array().expect("history list");
    // Creation, first study, financial update, second study; newest first.
    assert_eq!(entries.len(), 4);
    assert!(entries[0]["text"]
        .as_str()
        .expect("log text")
        .starts_with("Study: NO_VIABLE"));
    assert!(entries[2]["text"]
        .as_str()
        .expect("log text")
        .starts_with("Study: VIABLE"));

    assert_eq!(
        notifications.templates(),
        vec![VIABLE_TEMPLATE.to_string(), NOT_VIABLE_TEMPLATE.to_string()]
    );
    assert_eq!(repository.len(), 1);

    let pipeline = router
        .oneshot(request("GET", "/api/v1/leads", None))
        .await
        .expect("list executes");
    let pipeline = json_body(pipeline).await;
    assert_eq!(pipeline[0]["lead_id"], lead_id.as_str());
    assert_eq!(pipeline[0]["status"], "not_viable");
}

#[tokio::test]
async fn deleted_lead_is_gone() {
    let (service, repository, _) = service();
    let router = lead_router(service);

    let created = router
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/leads",
            Some(json!({ "name": "Pablo Ortega" })),
        ))
        .await
        .expect("create executes");
    let lead_id = json_body(created).await["lead_id"]
        .as_str()
        .expect("lead id")
        .to_string();

    let deleted = router
        .clone()
        .oneshot(request("DELETE", &format!("/api/v1/leads/{lead_id}"), None))
        .await
        .expect("delete executes");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(repository.len(), 0);

    let lookup = router
        .oneshot(request("GET", &format!("/api/v1/leads/{lead_id}"), None))
        .await
        .expect("lookup executes");
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[test]
fn imported_rows_are_studied_and_scored() {
    let csv = "\
name,email,phone,tipo_operacion,modalidad_compra,edad,ingresos_netos,precio_real,aportacion_real,otras_cuotas,tasa_interes,plazo_anos,bank_score
Lucía Martín,lucia@example.com,,habitual,solo,40,3000,200.000,60.000,100,\"2,6\",30,720
Jorge Ruiz,,,segunda,pareja,60,5.000,200000,10000,,,,
";
    let submissions = LeadCsvImporter::from_reader(Cursor::new(csv)).expect("csv parses");
    assert_eq!(submissions.len(), 2);

    let (service, _, notifications) = service();
    let mut statuses = Vec::new();
    for submission in submissions {
        let record = service.create(submission).expect("lead created");
        let study = service.run_study(&record.id).expect("study runs");
        let stored = service.get(&record.id).expect("lead stored");
        assert_eq!(stored.status, LeadStatus::from(study.status));
        statuses.push((study.status, study.score.score));
    }

    assert_eq!(statuses[0], (OperationStatus::Viable, 85));
    assert_eq!(statuses[1].0, OperationStatus::NotViable);
    assert_eq!(notifications.templates().len(), 2);
}
