use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::mortgage::{
    BorrowerProfile, LeadFinancialsForm, OperationStatus, ViabilityResult,
};
use crate::workflows::scoring::LeadScore;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Lead as captured by a web form or an import, financial fields still raw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub bank_score: Option<u16>,
    #[serde(default)]
    pub financials: LeadFinancialsForm,
}

/// Pipeline position driven by the latest study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Viable,
    NotViable,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Viable => "viable",
            LeadStatus::NotViable => "not_viable",
        }
    }
}

impl From<OperationStatus> for LeadStatus {
    fn from(status: OperationStatus) -> Self {
        match status {
            OperationStatus::Viable => LeadStatus::Viable,
            OperationStatus::NotViable => LeadStatus::NotViable,
        }
    }
}

/// Viability result and commercial score persisted on the lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub status: OperationStatus,
    pub result: ViabilityResult,
    pub score: LeadScore,
    pub studied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub bank_score: Option<u16>,
    pub financials: BorrowerProfile,
    pub status: LeadStatus,
    pub last_study: Option<StudyRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn status_view(&self) -> LeadStatusView {
        LeadStatusView {
            lead_id: self.id.clone(),
            name: self.name.clone(),
            status: self.status.label(),
            summary: self
                .last_study
                .as_ref()
                .map(|study| study.result.summary())
                .unwrap_or_else(|| "pending study".to_string()),
            score: self.last_study.as_ref().map(|study| study.score.score),
            requires_manual_review: self
                .last_study
                .as_ref()
                .map(|study| study.result.requires_manual_review),
        }
    }
}

/// Compact view returned by the HTTP endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusView {
    pub lead_id: LeadId,
    pub name: String,
    pub status: &'static str,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_manual_review: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Note,
    System,
}

/// Entry in a lead's history timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadLogEntry {
    pub lead_id: LeadId,
    pub kind: LogKind,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}
