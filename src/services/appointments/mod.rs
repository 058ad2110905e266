pub mod sqlite;

use crate::models::{AppointmentRecord, AppointmentSnapshot};

/// Store for confirmed appointments. Implementations degrade to `None` or an
/// empty list when the backend is unavailable and never return an error to
/// the conversation pipeline.
pub trait AppointmentStore: Send + Sync {
    fn save(&self, snapshot: &AppointmentSnapshot) -> Option<String>;

    fn retrieve(&self, id: &str) -> Option<AppointmentRecord>;

    /// Newest first.
    fn list_recent(&self, limit: usize) -> Vec<AppointmentRecord>;
}

pub struct DisconnectedAppointmentStore;

impl AppointmentStore for DisconnectedAppointmentStore {
    fn save(&self, _snapshot: &AppointmentSnapshot) -> Option<String> {
        tracing::debug!("appointment store not connected, nothing saved");
        None
    }

    fn retrieve(&self, _id: &str) -> Option<AppointmentRecord> {
        None
    }

    fn list_recent(&self, _limit: usize) -> Vec<AppointmentRecord> {
        Vec::new()
    }
}
