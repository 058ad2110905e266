use serde::{Deserialize, Serialize};

use super::intent::CollectedInfo;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Greeting,
    SymptomCollection,
    SeverityAssessment,
    Emergency,
    DepartmentRecommendation,
    AppointmentOffer,
    CollectingDetails,
    BookingConfirmation,
    Completed,
}

impl ConversationState {
    pub const ALL: [ConversationState; 9] = [
        ConversationState::Greeting,
        ConversationState::SymptomCollection,
        ConversationState::SeverityAssessment,
        ConversationState::Emergency,
        ConversationState::DepartmentRecommendation,
        ConversationState::AppointmentOffer,
        ConversationState::CollectingDetails,
        ConversationState::BookingConfirmation,
        ConversationState::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Greeting => "greeting",
            ConversationState::SymptomCollection => "symptom_collection",
            ConversationState::SeverityAssessment => "severity_assessment",
            ConversationState::Emergency => "emergency",
            ConversationState::DepartmentRecommendation => "department_recommendation",
            ConversationState::AppointmentOffer => "appointment_offer",
            ConversationState::CollectingDetails => "collecting_details",
            ConversationState::BookingConfirmation => "booking_confirmation",
            ConversationState::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConversationState::Greeting => "👋 Welcome",
            ConversationState::SymptomCollection => "🔍 Collecting Symptoms",
            ConversationState::SeverityAssessment => "⚖️ Assessing Severity",
            ConversationState::Emergency => "🚨 EMERGENCY DETECTED",
            ConversationState::DepartmentRecommendation => "🏥 Department Recommendation",
            ConversationState::AppointmentOffer => "📋 Appointment Offered",
            ConversationState::CollectingDetails => "📝 Collecting Details",
            ConversationState::BookingConfirmation => "✅ Confirming Booking",
            ConversationState::Completed => "🎉 Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Moderate,
    Mild,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Moderate => "moderate",
            Severity::Mild => "mild",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "moderate" => Some(Severity::Moderate),
            "mild" => Some(Severity::Mild),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Moderate => "Moderate",
            Severity::Mild => "Mild",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDetails {
    pub patient_name: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub contact_number: Option<String>,
}

impl AppointmentDetails {
    /// Copies only the values the caller actually provided; an absent incoming
    /// value never clears one collected earlier.
    pub fn merge(&mut self, incoming: &CollectedInfo) {
        merge_field(&mut self.patient_name, incoming.patient_name.as_deref());
        merge_field(&mut self.preferred_date, incoming.preferred_date.as_deref());
        merge_field(&mut self.preferred_time, incoming.preferred_time.as_deref());
        merge_field(&mut self.contact_number, incoming.contact_number.as_deref());
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.patient_name.is_none() {
            missing.push("patient_name");
        }
        if self.preferred_date.is_none() {
            missing.push("preferred_date");
        }
        if self.preferred_time.is_none() {
            missing.push("preferred_time");
        }
        if self.contact_number.is_none() {
            missing.push("contact_number");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn merge_field(slot: &mut Option<String>, incoming: Option<&str>) {
    if let Some(value) = incoming.map(str::trim).filter(|v| !v.is_empty()) {
        *slot = Some(value.to_string());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    #[serde(default)]
    pub state: ConversationState,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub is_emergency: bool,
    #[serde(default)]
    pub appointment: AppointmentDetails,
    #[serde(default)]
    pub history: Vec<ConversationMessage>,
    #[serde(default)]
    pub booking_id: Option<String>,
    /// Processed user turns; survives history trimming.
    #[serde(default)]
    pub turn_count: usize,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_turns(&self) -> usize {
        let in_history = self
            .history
            .iter()
            .filter(|m| m.role == Role::User)
            .count();
        in_history.max(self.turn_count)
    }

    pub fn push_message(&mut self, role: Role, content: &str, max_history: usize) {
        self.history.push(ConversationMessage {
            role,
            content: content.to_string(),
        });
        if self.history.len() > max_history {
            let excess = self.history.len() - max_history;
            self.history.drain(..excess);
        }
    }

    pub fn merge_symptoms<S: AsRef<str>>(&mut self, incoming: &[S]) {
        for symptom in incoming {
            let normalized = symptom.as_ref().trim().to_lowercase();
            if normalized.is_empty() || self.symptoms.contains(&normalized) {
                continue;
            }
            self.symptoms.push(normalized);
        }
    }

    /// Last writer wins, except that a critical rating held during an
    /// emergency episode is not downgraded.
    pub fn record_severity(&mut self, severity: Severity) {
        let in_emergency_episode = self.state == ConversationState::Emergency
            && self.severity == Some(Severity::Critical);
        if in_emergency_episode && severity != Severity::Critical {
            tracing::debug!(
                incoming = severity.as_str(),
                "keeping critical severity during emergency"
            );
            return;
        }
        self.severity = Some(severity);
    }

    pub fn escalate_emergency(&mut self) {
        self.state = ConversationState::Emergency;
        self.is_emergency = true;
        self.severity = Some(Severity::Critical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: Option<&str>, contact: Option<&str>) -> CollectedInfo {
        CollectedInfo {
            patient_name: name.map(String::from),
            contact_number: contact.map(String::from),
            ..CollectedInfo::default()
        }
    }

    #[test]
    fn test_state_parse_round_trip_and_unknown() {
        for state in ConversationState::ALL {
            assert_eq!(ConversationState::parse(state.as_str()), Some(state));
        }
        assert_eq!(
            ConversationState::parse(" Booking_Confirmation "),
            Some(ConversationState::BookingConfirmation)
        );
        assert_eq!(ConversationState::parse("triage"), None);
        assert_eq!(ConversationState::parse(""), None);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::parse(" mild "), Some(Severity::Mild));
        assert_eq!(Severity::parse("severe"), None);
    }

    #[test]
    fn test_symptom_merge_is_idempotent() {
        let mut ctx = SessionContext::new();
        ctx.merge_symptoms(&["Headache", " nausea "]);
        ctx.merge_symptoms(&["headache", "HEADACHE  "]);
        assert_eq!(ctx.symptoms, vec!["headache", "nausea"]);
    }

    #[test]
    fn test_symptom_merge_never_shrinks() {
        let mut ctx = SessionContext::new();
        ctx.merge_symptoms(&["fever"]);
        ctx.merge_symptoms::<&str>(&[]);
        ctx.merge_symptoms(&["", "   "]);
        assert_eq!(ctx.symptoms, vec!["fever"]);
    }

    #[test]
    fn test_appointment_merge_ignores_absent_values() {
        let mut appt = AppointmentDetails::default();
        appt.merge(&info(Some("Jane Doe"), Some("555-0100")));
        appt.merge(&info(None, Some("   ")));
        assert_eq!(appt.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(appt.contact_number.as_deref(), Some("555-0100"));
        assert_eq!(appt.missing_fields(), vec!["preferred_date", "preferred_time"]);
        assert!(!appt.is_complete());
    }

    #[test]
    fn test_history_window() {
        let mut ctx = SessionContext::new();
        for i in 0..30 {
            ctx.push_message(Role::User, &format!("message {i}"), 4);
        }
        assert_eq!(ctx.history.len(), 4);
        assert_eq!(ctx.history[0].content, "message 26");
        assert_eq!(ctx.history[3].content, "message 29");
    }

    #[test]
    fn test_user_turns_survives_trimming() {
        let mut ctx = SessionContext::new();
        ctx.push_message(Role::User, "hi", 24);
        ctx.push_message(Role::Assistant, "hello", 24);
        assert_eq!(ctx.user_turns(), 1);
        ctx.turn_count = 40;
        assert_eq!(ctx.user_turns(), 40);
    }

    #[test]
    fn test_critical_not_downgraded_during_emergency() {
        let mut ctx = SessionContext::new();
        ctx.escalate_emergency();
        ctx.record_severity(Severity::Mild);
        assert_eq!(ctx.severity, Some(Severity::Critical));

        ctx.state = ConversationState::Greeting;
        ctx.record_severity(Severity::Mild);
        assert_eq!(ctx.severity, Some(Severity::Mild));
    }

    #[test]
    fn test_context_deserializes_with_missing_fields() {
        let ctx: SessionContext = serde_json::from_str(r#"{"state":"collecting_details"}"#).unwrap();
        assert_eq!(ctx.state, ConversationState::CollectingDetails);
        assert!(ctx.symptoms.is_empty());
        assert_eq!(ctx.appointment, AppointmentDetails::default());
    }
}
