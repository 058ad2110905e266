use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::AppointmentStore;
use crate::db::queries;
use crate::models::{AppointmentRecord, AppointmentSnapshot};

pub struct SqliteAppointmentStore {
    db: Mutex<Connection>,
}

impl SqliteAppointmentStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, Connection>> {
        match self.db.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                tracing::error!("appointment database lock poisoned");
                None
            }
        }
    }
}

impl AppointmentStore for SqliteAppointmentStore {
    fn save(&self, snapshot: &AppointmentSnapshot) -> Option<String> {
        let db = self.lock()?;
        match queries::insert_appointment(&db, snapshot) {
            Ok(record) => {
                tracing::info!(booking_id = %record.id, "appointment saved");
                Some(record.id)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save appointment");
                None
            }
        }
    }

    fn retrieve(&self, id: &str) -> Option<AppointmentRecord> {
        let db = self.lock()?;
        queries::get_appointment(&db, id).unwrap_or_else(|e| {
            tracing::error!(error = %e, booking_id = id, "failed to retrieve appointment");
            None
        })
    }

    fn list_recent(&self, limit: usize) -> Vec<AppointmentRecord> {
        let Some(db) = self.lock() else {
            return Vec::new();
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        queries::list_recent_appointments(&db, limit).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to list appointments");
            Vec::new()
        })
    }
}
