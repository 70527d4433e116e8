// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub department: String,
    pub date: DateTime<Utc>,
    pub time_slot: String,
    pub patient_details: PatientDetails,
    pub created_at: DateTime<Utc>,
}

/// Denormalized contact details embedded in the appointment record.
/// `email` is stored lowercase and trimmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

// Every field is optional at the serde layer so a missing or blank field
// surfaces as a 400 validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub department: Option<String>,
    pub date: Option<String>,
    pub time_slot: Option<String>,
    pub patient_details: Option<PatientDetailsInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientDetailsInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Invalid date format. Please use YYYY-MM-DD format.")]
    InvalidDate,

    #[error("This time slot is already booked. Please select another time.")]
    SlotTaken,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
