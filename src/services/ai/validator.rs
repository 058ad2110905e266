use serde_json::{Map, Value};

use crate::models::{CollectedInfo, ConversationState, Intent, Severity, TriageResult};

pub const FALLBACK_RESPONSE: &str = "I apologize, but I'm experiencing a technical issue right now. \
If you're experiencing a medical emergency, please call **911** or **112** immediately.\n\n\
Please try again in a moment.";

const EMERGENCY_NOTICE: &str = "🚨 **This appears to be a medical emergency.** \
Please call **911** or **112** immediately for urgent care.";

const CLARIFICATION_REQUEST: &str =
    "Thank you for sharing. Could you tell me more about your symptoms so I can better assist you?";

// Only present when the structured payload leaks into prose.
const FIELD_SIGNATURES: [&str; 5] = [
    "\"response\":",
    "\"severity\":",
    "\"extracted_symptoms\":",
    "\"is_emergency\":",
    "\"suggested_next_state\":",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    Direct,
    Fenced,
    Embedded,
}

impl ParseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseTier::Direct => "direct",
            ParseTier::Fenced => "fenced",
            ParseTier::Embedded => "embedded",
        }
    }
}

pub fn parse_response(raw: &str) -> TriageResult {
    match parse_object(raw) {
        Some((tier, object)) => {
            tracing::debug!(tier = tier.as_str(), "parsed generation output");
            validate_parsed(&object)
        }
        None => {
            let preview: String = raw.chars().take(200).collect();
            tracing::warn!(preview = %preview, "could not parse generation output, using fallback");
            fallback_result()
        }
    }
}

// Whole payload, then each fenced block, then first `{` to last `}`.
pub fn parse_object(raw: &str) -> Option<(ParseTier, Map<String, Value>)> {
    if let Some(object) = as_object(raw) {
        return Some((ParseTier::Direct, object));
    }

    if let Some(object) = fenced_blocks(raw).into_iter().find_map(as_object) {
        return Some((ParseTier::Fenced, object));
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start < end {
        if let Some(object) = as_object(&raw[start..=end]) {
            return Some((ParseTier::Embedded, object));
        }
    }

    None
}

fn as_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after = &rest[open + 3..];
        let body = after
            .strip_prefix("json")
            .or_else(|| after.strip_prefix("JSON"))
            .unwrap_or(after);
        let Some(close) = body.find("```") else {
            break;
        };
        blocks.push(body[..close].trim());
        rest = &body[close + 3..];
    }
    blocks
}

pub fn validate_parsed(object: &Map<String, Value>) -> TriageResult {
    let collected_info = match object.get("collected_info") {
        Some(Value::Object(info)) => CollectedInfo {
            patient_name: CollectedInfo::provided(info.get("patient_name").and_then(Value::as_str)),
            preferred_date: CollectedInfo::provided(
                info.get("preferred_date").and_then(Value::as_str),
            ),
            preferred_time: CollectedInfo::provided(
                info.get("preferred_time").and_then(Value::as_str),
            ),
            contact_number: CollectedInfo::provided(contact_value(info.get("contact_number")).as_deref()),
        },
        _ => CollectedInfo::default(),
    };

    let mut result = TriageResult {
        response: object
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        extracted_symptoms: string_list(object.get("extracted_symptoms")),
        severity: object
            .get("severity")
            .and_then(Value::as_str)
            .and_then(Severity::parse),
        is_emergency: flag(object.get("is_emergency")),
        recommended_department: CollectedInfo::provided(
            object.get("recommended_department").and_then(Value::as_str),
        ),
        intent: object
            .get("intent")
            .and_then(Value::as_str)
            .map(Intent::parse)
            .unwrap_or_default(),
        needs_clarification: flag(object.get("needs_clarification")),
        collected_info,
        suggested_next_state: object
            .get("suggested_next_state")
            .and_then(Value::as_str)
            .and_then(ConversationState::parse),
    };

    if result.response.trim().is_empty() || looks_like_structured(&result.response) {
        tracing::warn!("generation response empty or leaked structured data, substituting");
        result.response = synthesize_response(&result);
    }

    result
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

// Phone numbers sometimes come back as JSON numbers.
fn contact_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub fn looks_like_structured(text: &str) -> bool {
    let stripped = text.trim();
    if (stripped.starts_with('{') || stripped.starts_with('['))
        && serde_json::from_str::<Value>(stripped).is_ok()
    {
        return true;
    }

    let hits = FIELD_SIGNATURES
        .iter()
        .filter(|sig| stripped.contains(*sig))
        .count();
    hits >= 2
}

pub fn synthesize_response(result: &TriageResult) -> String {
    if result.is_emergency || result.severity == Some(Severity::Critical) {
        return EMERGENCY_NOTICE.to_string();
    }

    if let Some(department) = &result.recommended_department {
        let symptoms = if result.extracted_symptoms.is_empty() {
            "your symptoms".to_string()
        } else {
            result.extracted_symptoms.join(", ")
        };
        let severity = result.severity.map(|s| s.as_str()).unwrap_or("under review");
        return format!(
            "Based on {symptoms}, I recommend visiting **{department}**. \
             Assessed severity: **{severity}**. Would you like to book an appointment?"
        );
    }

    CLARIFICATION_REQUEST.to_string()
}

/// Final pass over outgoing text. Clean text is returned unchanged; a leaked
/// payload is unwrapped to its own clean `response` string when it has one,
/// otherwise replaced with [`synthesize_response`].
pub fn sanitize_response(text: &str, result: &TriageResult) -> String {
    if !text.trim().is_empty() && !looks_like_structured(text) {
        return text.to_string();
    }

    tracing::warn!("outgoing response looked like structured data, sanitizing");

    let inner = parse_object(text).and_then(|(_, object)| {
        object
            .get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    match inner {
        Some(inner) if !inner.trim().is_empty() && !looks_like_structured(&inner) => inner,
        _ => synthesize_response(result),
    }
}

pub fn fallback_result() -> TriageResult {
    TriageResult {
        response: FALLBACK_RESPONSE.to_string(),
        extracted_symptoms: Vec::new(),
        severity: None,
        is_emergency: false,
        recommended_department: None,
        intent: Intent::Other,
        needs_clarification: false,
        collected_info: CollectedInfo::default(),
        suggested_next_state: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"response":"Could you tell me how long you've had the headache?","extracted_symptoms":["Headache"],"severity":null,"is_emergency":false,"recommended_department":null,"intent":"symptom_report","needs_clarification":true,"collected_info":{"patient_name":null,"preferred_date":null,"preferred_time":null,"contact_number":null},"suggested_next_state":"symptom_collection"}"#;

    fn is_json_object(text: &str) -> bool {
        matches!(serde_json::from_str::<Value>(text.trim()), Ok(Value::Object(_)))
    }

    #[test]
    fn test_direct_parse() {
        let result = parse_response(VALID);
        assert_eq!(result.response, "Could you tell me how long you've had the headache?");
        assert_eq!(result.extracted_symptoms, vec!["Headache"]);
        assert_eq!(result.intent, Intent::SymptomReport);
        assert!(result.needs_clarification);
        assert_eq!(result.suggested_next_state, Some(ConversationState::SymptomCollection));
        assert_eq!(result.collected_info, CollectedInfo::default());
    }

    #[test]
    fn test_fenced_parse() {
        let raw = format!("Here is my answer:\n```json\n{VALID}\n```\nThanks");
        assert_eq!(parse_object(&raw).unwrap().0, ParseTier::Fenced);
        assert_eq!(parse_response(&raw).intent, Intent::SymptomReport);

        let untagged = format!("```\n{VALID}\n```");
        assert_eq!(parse_object(&untagged).unwrap().0, ParseTier::Fenced);
    }

    #[test]
    fn test_embedded_parse() {
        let raw = format!("Sure thing! {VALID} Let me know.");
        assert_eq!(parse_object(&raw).unwrap().0, ParseTier::Embedded);
        assert_eq!(parse_response(&raw).severity, None);
    }

    #[test]
    fn test_unparseable_falls_back() {
        for raw in ["", "null", "I'm not sure what format you want.", r#"{"response": "Hi", "severity": "#] {
            let result = parse_response(raw);
            assert_eq!(result, fallback_result(), "{raw:?}");
        }
    }

    #[test]
    fn test_lenient_field_types() {
        let raw = r#"{"response":"Noted.","extracted_symptoms":"back pain","severity":"Moderate","is_emergency":"false","intent":"SOMETHING_ELSE","collected_info":{"patient_name":"  Ana ","contact_number":5550100,"preferred_date":"None"},"suggested_next_state":"nowhere"}"#;
        let result = parse_response(raw);
        assert_eq!(result.extracted_symptoms, vec!["back pain"]);
        assert_eq!(result.severity, Some(Severity::Moderate));
        assert!(!result.is_emergency);
        assert_eq!(result.intent, Intent::Other);
        assert_eq!(result.collected_info.patient_name.as_deref(), Some("Ana"));
        assert_eq!(result.collected_info.contact_number.as_deref(), Some("5550100"));
        assert_eq!(result.collected_info.preferred_date, None);
        assert_eq!(result.suggested_next_state, None);
    }

    #[test]
    fn test_leaked_response_prefers_emergency_notice() {
        let raw = r#"{"response":"","is_emergency":true,"recommended_department":"Cardiology"}"#;
        assert_eq!(parse_response(raw).response, EMERGENCY_NOTICE);
    }

    #[test]
    fn test_leaked_response_uses_department() {
        let raw = r#"{"response":"{\"response\": \"hi\", \"severity\": \"mild\"}","recommended_department":"Neurology","severity":"moderate","extracted_symptoms":["headache","dizziness"]}"#;
        let response = parse_response(raw).response;
        assert_eq!(
            response,
            "Based on headache, dizziness, I recommend visiting **Neurology**. Assessed severity: **moderate**. Would you like to book an appointment?"
        );
    }

    #[test]
    fn test_missing_response_asks_for_clarification() {
        let result = parse_response(r#"{"intent":"greeting"}"#);
        assert_eq!(result.response, CLARIFICATION_REQUEST);
        assert_eq!(result.intent, Intent::Greeting);
    }

    #[test]
    fn test_signature_detection() {
        assert!(looks_like_structured(r#"Sure: "response": "hi", "severity": "mild""#));
        assert!(!looks_like_structured(r#"The "severity": field is one signature only"#));
        assert!(looks_like_structured("[1, 2, 3]"));
        assert!(!looks_like_structured("[1] Call 911 now"));
        assert!(!looks_like_structured("{ not json at all"));
    }

    #[test]
    fn test_adversarial_fixtures_never_leak() {
        let fixtures = [
            VALID.to_string(),
            format!("```json\n{VALID}\n```"),
            r#"{"response": {"text": "nested"}}"#.to_string(),
            r#"{"response": "{\"a\": 1}"}"#.to_string(),
            r#"{"response": "[\"x\", \"y\"]", "recommended_department": "ENT"}"#.to_string(),
            r#"{"response": "ok \"response\": 1, \"is_emergency\": false"}"#.to_string(),
            r#"[{"response": "{\"severity\": \"mild\"}"}]"#.to_string(),
            "\"{\\\"response\\\": \\\"hi\\\"}\"".to_string(),
            "```json\n{\"response\": \"unterminated".to_string(),
            "{}".to_string(),
            "{\"response\": \"   \"}".to_string(),
        ];
        for raw in &fixtures {
            let result = parse_response(raw);
            assert!(!result.response.trim().is_empty(), "{raw}");
            assert!(!looks_like_structured(&result.response), "{raw}");
            assert!(!is_json_object(&result.response), "{raw}");
        }
    }

    #[test]
    fn test_sanitize_passes_clean_text_through() {
        let result = fallback_result();
        assert_eq!(sanitize_response("All good.", &result), "All good.");
    }

    #[test]
    fn test_sanitize_unwraps_inner_response() {
        let result = fallback_result();
        let leaked = r#"{"response": "Please rest and drink fluids.", "severity": "mild"}"#;
        assert_eq!(sanitize_response(leaked, &result), "Please rest and drink fluids.");
    }

    #[test]
    fn test_sanitize_synthesizes_when_no_clean_inner_text() {
        let mut result = fallback_result();
        result.recommended_department = Some("Dermatology".to_string());
        let leaked = r#"{"severity": "mild", "extracted_symptoms": []}"#;
        let cleaned = sanitize_response(leaked, &result);
        assert!(cleaned.contains("**Dermatology**"));
        assert!(!looks_like_structured(&cleaned));
        assert_eq!(sanitize_response("  ", &fallback_result()), CLARIFICATION_REQUEST);
    }
}
