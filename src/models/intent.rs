use serde::{Deserialize, Serialize};

use super::conversation::{ConversationState, Severity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SymptomReport,
    ClarificationResponse,
    BookingRequest,
    ProvidingDetails,
    Confirmation,
    Cancellation,
    #[default]
    #[serde(other)]
    Other,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::SymptomReport => "symptom_report",
            Intent::ClarificationResponse => "clarification_response",
            Intent::BookingRequest => "booking_request",
            Intent::ProvidingDetails => "providing_details",
            Intent::Confirmation => "confirmation",
            Intent::Cancellation => "cancellation",
            Intent::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "greeting" => Intent::Greeting,
            "symptom_report" => Intent::SymptomReport,
            "clarification_response" => Intent::ClarificationResponse,
            "booking_request" => Intent::BookingRequest,
            "providing_details" => Intent::ProvidingDetails,
            "confirmation" => Intent::Confirmation,
            "cancellation" => Intent::Cancellation,
            _ => Intent::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectedInfo {
    pub patient_name: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub contact_number: Option<String>,
}

impl CollectedInfo {
    /// Normalizes a raw value: blank strings and textual null sentinels
    /// ("null", "none") count as absent.
    pub fn provided(raw: Option<&str>) -> Option<String> {
        let value = raw?.trim();
        match value.to_lowercase().as_str() {
            "" | "null" | "none" => None,
            _ => Some(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriageResult {
    pub response: String,
    pub extracted_symptoms: Vec<String>,
    pub severity: Option<Severity>,
    pub is_emergency: bool,
    pub recommended_department: Option<String>,
    pub intent: Intent,
    pub needs_clarification: bool,
    pub collected_info: CollectedInfo,
    pub suggested_next_state: Option<ConversationState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_parse_unknown_is_other() {
        assert_eq!(Intent::parse("booking_request"), Intent::BookingRequest);
        assert_eq!(Intent::parse("Cancellation"), Intent::Cancellation);
        assert_eq!(Intent::parse("small_talk"), Intent::Other);
    }

    #[test]
    fn test_intent_serde_unknown_is_other() {
        let intent: Intent = serde_json::from_str(r#""reschedule""#).unwrap();
        assert_eq!(intent, Intent::Other);
    }

    #[test]
    fn test_provided_filters_sentinels() {
        assert_eq!(CollectedInfo::provided(Some("  Jane ")), Some("Jane".to_string()));
        assert_eq!(CollectedInfo::provided(Some("null")), None);
        assert_eq!(CollectedInfo::provided(Some("None")), None);
        assert_eq!(CollectedInfo::provided(Some("")), None);
        assert_eq!(CollectedInfo::provided(None), None);
    }
}
