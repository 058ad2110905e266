use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::conversation::SessionContext;

pub const DEFAULT_DEPARTMENT: &str = "General Medicine";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentSnapshot {
    pub patient_name: String,
    pub contact_number: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub department: Option<String>,
    pub symptoms: Vec<String>,
    pub severity: Option<String>,
}

impl AppointmentSnapshot {
    pub fn from_context(ctx: &SessionContext) -> Self {
        let appt = &ctx.appointment;
        Self {
            patient_name: appt.patient_name.clone().unwrap_or_default(),
            contact_number: appt.contact_number.clone().unwrap_or_default(),
            preferred_date: appt.preferred_date.clone().unwrap_or_default(),
            preferred_time: appt.preferred_time.clone().unwrap_or_default(),
            department: ctx.department.clone(),
            symptoms: ctx.symptoms.clone(),
            severity: ctx.severity.map(|s| s.as_str().to_string()),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Patient reported: {}. Assessed severity: {}. Routed to: {}.",
            self.symptoms.join(", "),
            self.severity.as_deref().unwrap_or("unknown"),
            self.department.as_deref().unwrap_or("unknown"),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    pub id: String,
    pub patient_name: String,
    pub contact_number: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub department: String,
    pub symptoms: Vec<String>,
    pub severity: String,
    pub status: String,
    pub booking_timestamp: NaiveDateTime,
    pub conversation_summary: String,
}

pub fn short_booking_id(id: &str) -> &str {
    let count = id.chars().count();
    match id.char_indices().nth(count.saturating_sub(8)) {
        Some((idx, _)) => &id[idx..],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_short_booking_id() {
        assert_eq!(short_booking_id("65f1c2a9e4b0d3a1b2c3d4e5"), "b2c3d4e5");
        assert_eq!(short_booking_id("abc"), "abc");
        assert_eq!(short_booking_id(""), "");
    }

    #[test]
    fn test_snapshot_summary() {
        let mut ctx = SessionContext::new();
        ctx.merge_symptoms(&["rash", "itching"]);
        ctx.severity = Some(Severity::Mild);
        ctx.department = Some("Dermatology".to_string());
        let snapshot = AppointmentSnapshot::from_context(&ctx);
        assert_eq!(
            snapshot.summary(),
            "Patient reported: rash, itching. Assessed severity: mild. Routed to: Dermatology."
        );
    }
}
