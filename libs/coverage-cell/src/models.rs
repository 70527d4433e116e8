// libs/coverage-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// COVERAGE APPLICATION MODELS
// ==============================================================================

/// An insurance-coverage request filed by a patient. Applications start out
/// Pending; an admin decision stamps `approved_by` and `approved_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub patient_name: String,
    pub patient_email: String,
    pub policy_id: String,
    pub provider: String,
    pub coverage_type: CoverageType,
    pub status: CoverageStatus,
    pub admin_notes: Option<String>,
    pub application_date: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CoverageType {
    Full,
    Partial,
    #[serde(rename = "Emergency Only")]
    EmergencyOnly,
    Dental,
    Vision,
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageType::Full => write!(f, "Full"),
            CoverageType::Partial => write!(f, "Partial"),
            CoverageType::EmergencyOnly => write!(f, "Emergency Only"),
            CoverageType::Dental => write!(f, "Dental"),
            CoverageType::Vision => write!(f, "Vision"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CoverageStatus {
    #[default]
    Pending,
    Approved,
    Declined,
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageStatus::Pending => write!(f, "Pending"),
            CoverageStatus::Approved => write!(f, "Approved"),
            CoverageStatus::Declined => write!(f, "Declined"),
        }
    }
}

impl CoverageApplication {
    /// File a new application. It starts Pending with no decision recorded.
    pub fn new(
        user_id: Uuid,
        patient_name: String,
        patient_email: String,
        policy_id: String,
        provider: String,
        coverage_type: CoverageType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            patient_name,
            patient_email,
            policy_id,
            provider,
            coverage_type,
            status: CoverageStatus::default(),
            admin_notes: None,
            application_date: Utc::now(),
            approved_by: None,
            approved_date: None,
        }
    }

    pub fn approve(&mut self, admin_id: Uuid) {
        self.record_decision(CoverageStatus::Approved, admin_id);
    }

    pub fn decline(&mut self, admin_id: Uuid) {
        self.record_decision(CoverageStatus::Declined, admin_id);
    }

    fn record_decision(&mut self, status: CoverageStatus, admin_id: Uuid) {
        self.status = status;
        self.approved_by = Some(admin_id);
        self.approved_date = Some(Utc::now());
    }

    pub fn is_decided(&self) -> bool {
        self.status != CoverageStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_application() -> CoverageApplication {
        CoverageApplication::new(
            Uuid::new_v4(),
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "POL-1234".to_string(),
            "Acme Insurance".to_string(),
            CoverageType::Partial,
        )
    }

    #[test]
    fn new_applications_start_pending() {
        let app = sample_application();
        assert_eq!(app.status, CoverageStatus::Pending);
        assert!(app.approved_by.is_none());
        assert!(app.approved_date.is_none());
        assert!(!app.is_decided());
    }

    #[test]
    fn approval_records_the_decision() {
        let mut app = sample_application();
        let admin = Uuid::new_v4();

        app.approve(admin);

        assert_eq!(app.status, CoverageStatus::Approved);
        assert_eq!(app.approved_by, Some(admin));
        assert!(app.approved_date.is_some());
        assert!(app.is_decided());
    }

    #[test]
    fn decline_records_the_decision() {
        let mut app = sample_application();
        let admin = Uuid::new_v4();

        app.decline(admin);

        assert_eq!(app.status, CoverageStatus::Declined);
        assert_eq!(app.approved_by, Some(admin));
        assert!(app.approved_date.is_some());
    }

    #[test]
    fn coverage_type_uses_original_wire_names() {
        let json = serde_json::to_string(&CoverageType::EmergencyOnly).unwrap();
        assert_eq!(json, "\"Emergency Only\"");

        let parsed: CoverageType = serde_json::from_str("\"Emergency Only\"").unwrap();
        assert_eq!(parsed, CoverageType::EmergencyOnly);
    }

    #[test]
    fn status_serializes_as_title_case() {
        let json = serde_json::to_string(&CoverageStatus::Declined).unwrap();
        assert_eq!(json, "\"Declined\"");
    }
}
