use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    LeadId, LeadLogEntry, LeadRecord, LeadStatus, LeadSubmission, LogKind, StudyRecord,
};
use super::repository::{
    LeadNotification, LeadRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use crate::workflows::mortgage::{
    LeadFinancialsForm, ProfileError, ViabilityConfig, ViabilityEvaluator,
};
use crate::workflows::scoring::{LeadScoreInput, LeadScorer, ScoringConfig};

pub const SYSTEM_AUTHOR: &str = "system";
pub const VIABLE_TEMPLATE: &str = "study_viable";
pub const NOT_VIABLE_TEMPLATE: &str = "study_not_viable";
const DEFAULT_SOURCE: &str = "web";

/// Service composing lead storage, the viability evaluator and the scorer.
pub struct LeadStudyService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    evaluator: Arc<ViabilityEvaluator>,
    scorer: Arc<LeadScorer>,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<R, N> LeadStudyService<R, N>
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, config: ViabilityConfig) -> Self {
        Self::with_scoring(repository, notifications, config, ScoringConfig::default())
    }

    pub fn with_scoring(
        repository: Arc<R>,
        notifications: Arc<N>,
        config: ViabilityConfig,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            repository,
            notifications,
            evaluator: Arc::new(ViabilityEvaluator::new(config)),
            scorer: Arc::new(LeadScorer::new(scoring)),
        }
    }

    pub fn evaluator(&self) -> &ViabilityEvaluator {
        &self.evaluator
    }

    /// Register a new lead. Financial fields are parsed but not yet studied.
    pub fn create(&self, submission: LeadSubmission) -> Result<LeadRecord, LeadServiceError> {
        let financials = submission.financials.to_profile();
        financials.validate()?;

        let now = Utc::now();
        let source = submission
            .source
            .filter(|source| !source.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        let record = LeadRecord {
            id: next_lead_id(),
            name: submission.name.trim().to_string(),
            email: submission.email,
            phone: submission.phone,
            source,
            bank_score: submission.bank_score,
            financials,
            status: LeadStatus::New,
            last_study: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        self.log_system(&stored.id, format!("Lead created from {}", stored.source))?;
        info!(lead_id = %stored.id.0, source = %stored.source, "lead created");
        Ok(stored)
    }

    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        let record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Pipeline board view: newest leads first, at most `limit`.
    pub fn list(&self, limit: usize) -> Result<Vec<LeadRecord>, LeadServiceError> {
        let mut records = self.repository.list(limit)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }

    /// Replace the lead's financial data. The previous study is kept until the
    /// next run so the pipeline does not lose its verdict on a manual edit.
    pub fn update_financials(
        &self,
        lead_id: &LeadId,
        form: &LeadFinancialsForm,
    ) -> Result<LeadRecord, LeadServiceError> {
        let mut record = self.get(lead_id)?;
        let financials = form.to_profile();
        financials.validate()?;

        record.financials = financials;
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        self.log_system(lead_id, "Financial data updated".to_string())?;
        Ok(record)
    }

    /// Evaluate the lead's current financials, persist the study and notify.
    pub fn run_study(&self, lead_id: &LeadId) -> Result<StudyRecord, LeadServiceError> {
        let mut record = self.get(lead_id)?;

        let result = self.evaluator.evaluate(&record.financials);
        if result.has_negative_financing() {
            warn!(
                lead_id = %lead_id.0,
                financing = result.financing_amount,
                "savings exceed property price; financing amount is negative"
            );
        }

        let input = LeadScoreInput::from_evaluation(&record.financials, &result, record.bank_score);
        let score = self.scorer.score(&input);
        let study = StudyRecord {
            status: result.status(),
            result,
            score,
            studied_at: Utc::now(),
        };

        record.status = LeadStatus::from(study.status);
        record.last_study = Some(study.clone());
        record.updated_at = study.studied_at;
        self.repository.update(record)?;
        self.log_system(lead_id, study.result.summary())?;

        info!(
            lead_id = %lead_id.0,
            status = study.status.label(),
            payment = study.result.monthly_payment,
            dti = study.result.debt_to_income_percent,
            ltv = study.result.loan_to_value_requested_percent,
            manual_review = study.result.requires_manual_review,
            "viability study completed"
        );

        self.notifications.publish(study_notification(lead_id, &study))?;
        Ok(study)
    }

    pub fn delete(&self, lead_id: &LeadId) -> Result<(), LeadServiceError> {
        self.repository.delete(lead_id)?;
        info!(lead_id = %lead_id.0, "lead deleted");
        Ok(())
    }

    pub fn history(&self, lead_id: &LeadId) -> Result<Vec<LeadLogEntry>, LeadServiceError> {
        self.get(lead_id)?;
        Ok(self.repository.logs(lead_id)?)
    }

    pub fn add_note(
        &self,
        lead_id: &LeadId,
        author: &str,
        text: &str,
    ) -> Result<LeadLogEntry, LeadServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LeadServiceError::EmptyNote);
        }
        self.get(lead_id)?;

        let entry = LeadLogEntry {
            lead_id: lead_id.clone(),
            kind: LogKind::Note,
            text: text.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
        };
        self.repository.append_log(entry.clone())?;
        Ok(entry)
    }

    fn log_system(&self, lead_id: &LeadId, text: String) -> Result<(), RepositoryError> {
        self.repository.append_log(LeadLogEntry {
            lead_id: lead_id.clone(),
            kind: LogKind::System,
            text,
            author: SYSTEM_AUTHOR.to_string(),
            created_at: Utc::now(),
        })
    }
}

fn study_notification(lead_id: &LeadId, study: &StudyRecord) -> LeadNotification {
    let template = if study.result.is_viable {
        VIABLE_TEMPLATE
    } else {
        NOT_VIABLE_TEMPLATE
    };

    let mut details = BTreeMap::new();
    details.insert("status".to_string(), study.status.label().to_string());
    details.insert(
        "monthly_payment".to_string(),
        study.result.monthly_payment.to_string(),
    );
    details.insert(
        "dti_percent".to_string(),
        study.result.debt_to_income_percent.to_string(),
    );
    details.insert(
        "ltv_percent".to_string(),
        study.result.loan_to_value_requested_percent.to_string(),
    );
    details.insert(
        "category".to_string(),
        study.score.category.label().to_string(),
    );

    LeadNotification {
        template: template.to_string(),
        lead_id: lead_id.clone(),
        details,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("note text must not be empty")]
    EmptyNote,
}
