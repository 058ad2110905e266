use serde::Serialize;

use crate::models::{short_booking_id, SessionContext, Severity};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusView {
    pub phase: String,
    pub symptoms: Vec<String>,
    pub severity: String,
    pub department: String,
    pub appointment: Vec<String>,
}

pub fn get_status_view(ctx: &SessionContext) -> StatusView {
    let severity = match ctx.severity {
        Some(Severity::Critical) => "🔴 CRITICAL",
        Some(Severity::Moderate) => "🟡 Moderate",
        Some(Severity::Mild) => "🟢 Mild",
        None => "⚪ Not assessed",
    };

    let appt = &ctx.appointment;
    let mut appointment: Vec<String> = [
        ("👤", &appt.patient_name),
        ("📅", &appt.preferred_date),
        ("🕐", &appt.preferred_time),
        ("📞", &appt.contact_number),
    ]
    .into_iter()
    .filter_map(|(icon, value)| value.as_ref().map(|v| format!("{icon} {v}")))
    .collect();
    if let Some(id) = &ctx.booking_id {
        appointment.push(format!("🆔 {}", short_booking_id(id)));
    }

    StatusView {
        phase: ctx.state.label().to_string(),
        symptoms: ctx.symptoms.iter().map(|s| title_case(s)).collect(),
        severity: severity.to_string(),
        department: ctx
            .department
            .as_ref()
            .map(|d| format!("🏥 {d}"))
            .unwrap_or_else(|| "Not determined".to_string()),
        appointment,
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationState;

    #[test]
    fn test_fresh_session_view() {
        let view = get_status_view(&SessionContext::new());
        assert_eq!(view.phase, "👋 Welcome");
        assert!(view.symptoms.is_empty());
        assert_eq!(view.severity, "⚪ Not assessed");
        assert_eq!(view.department, "Not determined");
        assert!(view.appointment.is_empty());
    }

    #[test]
    fn test_populated_view_does_not_mutate() {
        let mut ctx = SessionContext::new();
        ctx.state = ConversationState::Completed;
        ctx.merge_symptoms(&["sore throat", "fever"]);
        ctx.severity = Some(Severity::Mild);
        ctx.department = Some("ENT (Ear, Nose & Throat)".to_string());
        ctx.appointment.patient_name = Some("Sam".to_string());
        ctx.appointment.contact_number = Some("555-0142".to_string());
        ctx.booking_id = Some("0f6a2b1c-1111-2222-3333-abcdef123456".to_string());
        let before = ctx.clone();

        let view = get_status_view(&ctx);
        assert_eq!(ctx, before);
        assert_eq!(view.phase, "🎉 Completed");
        assert_eq!(view.symptoms, vec!["Sore Throat", "Fever"]);
        assert_eq!(view.severity, "🟢 Mild");
        assert_eq!(view.department, "🏥 ENT (Ear, Nose & Throat)");
        assert_eq!(view.appointment, vec!["👤 Sam", "📞 555-0142", "🆔 ef123456"]);
    }
}
