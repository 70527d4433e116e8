// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::error;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::AppointmentBookingService;

// Unexpected persistence failures are logged here with the operation name and
// surfaced as a generic message, never the underlying detail.
fn booking_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::InvalidDate => AppError::ValidationError(e.to_string()),
        AppointmentError::SlotTaken => AppError::Conflict(e.to_string()),
        AppointmentError::DatabaseError(detail) => {
            error!("Error creating appointment: {}", detail);
            AppError::Internal("Server error while saving appointment. Please try again.".to_string())
        }
    }
}

fn fetch_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::InvalidDate => AppError::ValidationError(e.to_string()),
        AppointmentError::SlotTaken => AppError::Conflict(e.to_string()),
        AppointmentError::DatabaseError(detail) => {
            error!("Error fetching appointments: {}", detail);
            AppError::Internal("Server error while fetching appointments.".to_string())
        }
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AppointmentBookingService::new(&config);

    let appointment = service
        .create_appointment(request)
        .await
        .map_err(booking_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment confirmed successfully!",
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<impl IntoResponse, AppError> {
    let service = AppointmentBookingService::new(&config);

    let appointments = service.list_all().await.map_err(fetch_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_appointments_by_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = AppointmentBookingService::new(&config);

    let appointments = service
        .list_for_patient(&patient_id)
        .await
        .map_err(fetch_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

/// Legacy read kept for clients still keyed on the contact email.
#[axum::debug_handler]
pub async fn get_appointments_by_email(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = AppointmentBookingService::new(&config);

    let appointments = service
        .list_for_email(&email)
        .await
        .map_err(fetch_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_appointments_by_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = AppointmentBookingService::new(&config);

    let appointments = service
        .list_for_doctor(&doctor_id)
        .await
        .map_err(fetch_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_appointments_by_doctor_and_date(
    State(config): State<Arc<AppConfig>>,
    Path((doctor_id, date)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = AppointmentBookingService::new(&config);

    let appointments = service
        .list_for_doctor_on_date(&doctor_id, &date)
        .await
        .map_err(fetch_error)?;

    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "doctor_id": doctor_id,
        "date": date,
        "count": count
    })))
}
