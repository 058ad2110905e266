use crate::models::{Role, SessionContext};
use crate::services::knowledge::department_prompt_info;

const PROMPT_HISTORY: usize = 10;

const SYSTEM_PROMPT_HEAD: &str = r#"You are a professional healthcare triage assistant for a hospital system.
Your name is "HealthAssist". You are empathetic, professional, and thorough.

## YOUR ROLE
1. Understand patient symptoms through caring, multi-turn conversation
2. Ask clarifying follow-up questions when symptoms are vague or incomplete
3. Assess the severity of their condition (Critical, Moderate, or Mild)
4. Recommend the appropriate hospital department
5. Help book appointments for NON-CRITICAL cases only

## CRITICAL SAFETY RULES (NEVER VIOLATE)
- You are NOT a doctor. NEVER diagnose conditions or prescribe treatments.
- For CRITICAL/EMERGENCY cases: IMMEDIATELY advise calling emergency services (911/112).
  Do NOT continue the booking flow for critical cases.
- Always err on the side of caution. If unsure, classify as higher severity.
- If the user mentions chest pain, difficulty breathing, loss of consciousness,
  severe bleeding, stroke symptoms, seizures, poisoning, or suicidal thoughts,
  treat it as a CRITICAL emergency.

## CONVERSATION FLOW
1. Greet the user warmly and ask about their health concern
2. Extract and clarify symptoms (ask follow-up questions as needed)
3. Assess severity (Critical leads to emergency escalation, Moderate/Mild continue)
4. Recommend appropriate department and explain why
5. Offer to book an appointment
6. Collect appointment details: patient name, preferred date, preferred time, contact number
7. Confirm the appointment details

## INTENT SWITCHING
- If a user switches intent mid-conversation (e.g., mentions emergency symptoms while booking),
  you MUST immediately switch to triage/emergency mode.
- After handling the new intent, you may offer to resume the previous flow if appropriate.

## AVAILABLE DEPARTMENTS
"#;

const SYSTEM_PROMPT_SCHEMA: &str = r#"

## RESPONSE FORMAT
You MUST respond with ONLY a valid JSON object (no markdown, no extra text). Schema:
{
  "response": "Your natural, empathetic message to the user (use markdown formatting for readability)",
  "extracted_symptoms": ["symptom1", "symptom2"],
  "severity": "critical" | "moderate" | "mild" | null,
  "is_emergency": true | false,
  "recommended_department": "Department Name" | null,
  "intent": "greeting" | "symptom_report" | "clarification_response" | "booking_request" | "providing_details" | "confirmation" | "cancellation" | "other",
  "needs_clarification": true | false,
  "collected_info": {
    "patient_name": "extracted name or null",
    "preferred_date": "extracted date or null",
    "preferred_time": "extracted time or null",
    "contact_number": "extracted number or null"
  },
  "suggested_next_state": "greeting" | "symptom_collection" | "severity_assessment" | "emergency" | "department_recommendation" | "appointment_offer" | "collecting_details" | "booking_confirmation" | "completed"
}
"#;

const TASK_HINTS: &str = r#"## YOUR TASK
Based on the current state and conversation context, respond appropriately.
- If state is "greeting": Welcome the user and ask about their health concern.
- If state is "symptom_collection": Extract symptoms, ask clarifying questions if needed.
- If state is "severity_assessment": Classify severity and proceed accordingly.
- If state is "department_recommendation": Recommend a department and explain why.
- If state is "appointment_offer": Ask if they'd like to book an appointment.
- If state is "collecting_details": Ask for the NEXT missing piece of appointment info.
- If state is "booking_confirmation": Summarize all details and ask for confirmation.
- If state is "emergency": Advise calling emergency services IMMEDIATELY.
- If state is "completed": Confirm booking and offer further help.

Respond with ONLY a valid JSON object."#;

pub fn system_prompt() -> String {
    format!(
        "{SYSTEM_PROMPT_HEAD}{}{SYSTEM_PROMPT_SCHEMA}",
        department_prompt_info()
    )
}

pub fn build_context_prompt(ctx: &SessionContext, latest_message: &str) -> String {
    let recent = &ctx.history[ctx.history.len().saturating_sub(PROMPT_HISTORY)..];
    let history: String = recent
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "Patient",
                Role::Assistant => "HealthAssist",
            };
            format!("{speaker}: {}\n", m.content)
        })
        .collect();

    let appt = &ctx.appointment;
    let fields = [
        ("Patient Name", &appt.patient_name),
        ("Preferred Date", &appt.preferred_date),
        ("Preferred Time", &appt.preferred_time),
        ("Contact Number", &appt.contact_number),
    ];
    let collected: Vec<String> = fields
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect();
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(label, _)| *label)
        .collect();

    let or = |items: String, empty: &str| {
        if items.is_empty() {
            empty.to_string()
        } else {
            items
        }
    };

    format!(
        "## CURRENT CONVERSATION CONTEXT\n\
         - **Current State**: {state}\n\
         - **Collected Symptoms**: {symptoms}\n\
         - **Severity Assessment**: {severity}\n\
         - **Recommended Department**: {department}\n\
         - **Appointment Info Collected**: {collected}\n\
         - **Still Needed**: {missing}\n\n\
         ## CONVERSATION HISTORY\n\
         {history}\n\n\
         ## LATEST PATIENT MESSAGE\n\
         Patient: {latest_message}\n\n\
         {TASK_HINTS}",
        state = ctx.state.as_str(),
        symptoms = or(ctx.symptoms.join(", "), "None yet"),
        severity = ctx.severity.map(|s| s.as_str()).unwrap_or("Not assessed yet"),
        department = ctx.department.as_deref().unwrap_or("Not determined yet"),
        collected = or(collected.join(", "), "None yet"),
        missing = or(missing.join(", "), "All info collected"),
        history = or(history, "(This is the start of the conversation)"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConversationState, Severity};

    #[test]
    fn test_system_prompt_includes_departments_and_schema() {
        let prompt = system_prompt();
        assert!(prompt.contains("- Cardiology: Heart and cardiovascular system"));
        assert!(prompt.contains("\"suggested_next_state\""));
    }

    #[test]
    fn test_context_prompt_for_fresh_session() {
        let prompt = build_context_prompt(&SessionContext::new(), "hello");
        assert!(prompt.contains("- **Current State**: greeting"));
        assert!(prompt.contains("- **Collected Symptoms**: None yet"));
        assert!(prompt.contains("(This is the start of the conversation)"));
        assert!(prompt.contains(
            "- **Still Needed**: Patient Name, Preferred Date, Preferred Time, Contact Number"
        ));
        assert!(prompt.contains("Patient: hello"));
    }

    #[test]
    fn test_context_prompt_quotes_recent_history_only() {
        let mut ctx = SessionContext::new();
        ctx.state = ConversationState::CollectingDetails;
        ctx.severity = Some(Severity::Mild);
        ctx.appointment.patient_name = Some("Jane".to_string());
        for i in 0..12 {
            ctx.push_message(Role::User, &format!("turn {i}"), 24);
        }

        let prompt = build_context_prompt(&ctx, "my number is 555-0100");
        assert!(prompt.contains("- **Severity Assessment**: mild"));
        assert!(prompt.contains("- **Appointment Info Collected**: Patient Name: Jane"));
        assert!(!prompt.contains("Patient: turn 1\n"));
        assert!(prompt.contains("Patient: turn 2\n"));
        assert!(prompt.contains("Patient: turn 11\n"));
    }
}
