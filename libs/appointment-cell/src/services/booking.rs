// libs/appointment-cell/src/services/booking.rs
use anyhow::Error as AnyError;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use urlencoding::encode;

use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, UniqueViolation};

use crate::models::{Appointment, AppointmentError, BookAppointmentRequest};

const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";

pub struct AppointmentBookingService {
    supabase: Arc<SupabaseClient>,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    /// Book a new appointment after validating the request and checking that
    /// the (doctor, date, time slot) triple is still free.
    ///
    /// The store also carries a unique index on the triple, so a booking that
    /// loses a race between the pre-check and the insert is rejected there and
    /// reported as the same slot-taken conflict.
    pub async fn create_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let (patient_id, doctor_id, department, date_raw, time_slot) = match (
            required(&request.patient_id),
            required(&request.doctor_id),
            required(&request.department),
            required(&request.date),
            required(&request.time_slot),
        ) {
            (Some(p), Some(d), Some(dep), Some(date), Some(slot)) => (p, d, dep, date, slot),
            _ => {
                return Err(AppointmentError::ValidationError(
                    "All appointment fields are required.".to_string(),
                ))
            }
        };

        let details = request.patient_details.as_ref();
        let (full_name, email_raw, phone) = match details.map(|d| {
            (
                required(&d.full_name),
                required(&d.email),
                required(&d.phone),
            )
        }) {
            Some((Some(name), Some(email), Some(phone))) => (name, email, phone),
            _ => {
                return Err(AppointmentError::ValidationError(
                    "Patient details (name, email, phone) are required.".to_string(),
                ))
            }
        };

        let email = normalize_email(email_raw);
        if !is_valid_email(&email) {
            return Err(AppointmentError::ValidationError(
                "Invalid email address.".to_string(),
            ));
        }

        let date = parse_date_input(date_raw).ok_or(AppointmentError::InvalidDate)?;

        debug!(
            "Booking appointment for patient {} with doctor {} at {} {}",
            patient_id, doctor_id, date, time_slot
        );

        // Pre-check so the common case gets a friendly conflict message
        // without relying on the unique index.
        let conflict_path = format!(
            "{}?doctor_id=eq.{}&date=eq.{}&time_slot=eq.{}&limit=1",
            APPOINTMENTS_PATH,
            encode(doctor_id),
            encode(&date.to_rfc3339()),
            encode(time_slot),
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &conflict_path, None)
            .await
            .map_err(db_error)?;

        if !existing.is_empty() {
            warn!(
                "Slot conflict for doctor {} at {} {}",
                doctor_id, date, time_slot
            );
            return Err(AppointmentError::SlotTaken);
        }

        let record = json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "department": department,
            "date": date.to_rfc3339(),
            "time_slot": time_slot,
            "patient_details": {
                "full_name": full_name,
                "email": email,
                "phone": phone,
            },
            "created_at": Utc::now().to_rfc3339(),
        });

        let created: Vec<Appointment> = self
            .supabase
            .insert(APPOINTMENTS_PATH, record)
            .await
            .map_err(|e| {
                if e.downcast_ref::<UniqueViolation>().is_some() {
                    // Lost the race: another request inserted the same triple
                    // between our pre-check and this insert.
                    AppointmentError::SlotTaken
                } else {
                    db_error(e)
                }
            })?;

        let appointment = created.into_iter().next().ok_or_else(|| {
            AppointmentError::DatabaseError("insert returned no representation".to_string())
        })?;

        info!("Appointment {} booked for doctor {}", appointment.id, doctor_id);
        Ok(appointment)
    }

    /// All appointments, ascending by (date, time slot).
    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!("{}?order=date.asc,time_slot.asc", APPOINTMENTS_PATH);
        self.fetch(&path).await
    }

    pub async fn list_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let patient_id = patient_id.trim();
        if patient_id.is_empty() {
            return Err(AppointmentError::ValidationError(
                "Patient ID is required.".to_string(),
            ));
        }

        let path = format!(
            "{}?patient_id=eq.{}&order=date.asc,time_slot.asc",
            APPOINTMENTS_PATH,
            encode(patient_id),
        );
        self.fetch(&path).await
    }

    /// Legacy lookup matching the embedded contact email.
    pub async fn list_for_email(&self, email: &str) -> Result<Vec<Appointment>, AppointmentError> {
        if email.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Email is required.".to_string(),
            ));
        }

        let normalized = normalize_email(email);
        let path = format!(
            "{}?patient_details->>email=eq.{}&order=date.asc,time_slot.asc",
            APPOINTMENTS_PATH,
            encode(&normalized),
        );
        self.fetch(&path).await
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let doctor_id = doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(AppointmentError::ValidationError(
                "Doctor ID is required.".to_string(),
            ));
        }

        let path = format!(
            "{}?doctor_id=eq.{}&order=date.asc,time_slot.asc",
            APPOINTMENTS_PATH,
            encode(doctor_id),
        );
        self.fetch(&path).await
    }

    /// Appointments for one doctor inside the inclusive UTC day window of the
    /// given date, ascending by time slot.
    pub async fn list_for_doctor_on_date(
        &self,
        doctor_id: &str,
        date: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let doctor_id = doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(AppointmentError::ValidationError(
                "Doctor ID is required.".to_string(),
            ));
        }
        if date.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Date is required.".to_string(),
            ));
        }

        let target = parse_date_input(date).ok_or(AppointmentError::InvalidDate)?;
        let (start_of_day, end_of_day) = day_bounds(target.date_naive());

        debug!(
            "Fetching appointments for doctor {} between {} and {}",
            doctor_id, start_of_day, end_of_day
        );

        let path = format!(
            "{}?doctor_id=eq.{}&date=gte.{}&date=lte.{}&order=time_slot.asc",
            APPOINTMENTS_PATH,
            encode(doctor_id),
            encode(&start_of_day.to_rfc3339()),
            encode(&end_of_day.to_rfc3339()),
        );
        self.fetch(&path).await
    }

    async fn fetch(&self, path: &str) -> Result<Vec<Appointment>, AppointmentError> {
        self.supabase
            .request(Method::GET, path, None)
            .await
            .map_err(db_error)
    }
}

fn db_error(e: AnyError) -> AppointmentError {
    AppointmentError::DatabaseError(e.to_string())
}

// A present-but-blank field counts as missing.
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape: one `@`, a `.` after it, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    email_regex.is_match(email)
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is read
/// as midnight UTC.
pub fn parse_date_input(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// Inclusive UTC window covering one calendar date, from midnight to
/// 23:59:59.999.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn normalizes_email_case_and_whitespace() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn accepts_plain_emails() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+clinic@mail.example.co"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("jane.example.com")); // no @
        assert!(!is_valid_email("jane@example")); // no dot after @
        assert!(!is_valid_email("jane doe@example.com")); // whitespace
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn parses_bare_dates_as_midnight_utc() {
        let dt = parse_date_input("2024-06-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let dt = parse_date_input("2024-06-01T09:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 7); // converted to UTC
    }

    #[test]
    fn rejects_unparseable_dates() {
        assert!(parse_date_input("not-a-date").is_none());
        assert!(parse_date_input("01/06/2024").is_none());
        assert!(parse_date_input("").is_none());
    }

    #[test]
    fn day_bounds_cover_the_full_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_rfc3339(), "2024-06-01T00:00:00+00:00");
        assert_eq!(end.timestamp_subsec_millis(), 999);
        assert!(start < end);
        assert_eq!(start.date_naive(), end.date_naive());
    }

    #[test]
    fn blank_fields_count_as_missing() {
        assert_eq!(required(&None), None);
        assert_eq!(required(&Some("   ".to_string())), None);
        assert_eq!(required(&Some(" D1 ".to_string())), Some("D1"));
    }
}
