use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::AppointmentRecord;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub limit: Option<usize>,
}

// GET /api/appointments
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentsQuery>,
) -> Json<Vec<AppointmentRecord>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Json(state.appointments.list_recent(limit))
}

// GET /api/appointments/:id
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentRecord>, AppError> {
    state
        .appointments
        .retrieve(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))
}
