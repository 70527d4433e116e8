// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_appointment).get(handlers::get_all_appointments),
        )
        .route("/patients/{patient_id}", get(handlers::get_appointments_by_patient))
        .route("/email/{email}", get(handlers::get_appointments_by_email))
        .route("/doctors/{doctor_id}", get(handlers::get_appointments_by_doctor))
        .route(
            "/doctors/{doctor_id}/date/{date}",
            get(handlers::get_appointments_by_doctor_and_date),
        )
        .with_state(state)
}
