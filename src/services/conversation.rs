use crate::models::{ConversationState, Intent, Role, SessionContext, Severity};
use crate::services::ai::triage::generate_triage;
use crate::services::ai::validator::sanitize_response;
use crate::services::booking::handle_booking;
use crate::services::emergency;
use crate::services::state_machine::is_valid_transition;
use crate::state::AppState;

pub const EMPTY_MESSAGE_PROMPT: &str = "Please type a message to get started.";

pub const TURN_LIMIT_MESSAGE: &str = "⚠️ This conversation has reached the maximum number of turns. \
Please start a **New Conversation** to continue.";

const TRUNCATION_MARKER: &str = "... (truncated)";

/// State precedence: keyword match, service emergency flag or critical
/// severity, intent switch, then the suggested transition if the table allows it.
pub async fn process_message(
    state: &AppState,
    message: &str,
    mut ctx: SessionContext,
) -> (String, SessionContext) {
    let limits = state.config.limits;

    let message = message.trim();
    if message.is_empty() {
        return (EMPTY_MESSAGE_PROMPT.to_string(), ctx);
    }

    let prior_turns = ctx.user_turns();
    if prior_turns >= limits.max_turns {
        tracing::warn!(turns = prior_turns, max = limits.max_turns, "turn limit reached");
        return (TURN_LIMIT_MESSAGE.to_string(), ctx);
    }

    let message = truncate_message(message, limits.max_message_chars);

    ctx.push_message(Role::User, &message, limits.max_history);
    ctx.turn_count = prior_turns + 1;

    let emergency_matches = emergency::scan(&message);

    let result = generate_triage(state.llm.as_ref(), &ctx, &message).await;

    ctx.merge_symptoms(&result.extracted_symptoms);
    if let Some(severity) = result.severity {
        ctx.record_severity(severity);
    }
    if let Some(department) = &result.recommended_department {
        ctx.department = Some(department.clone());
    }
    ctx.appointment.merge(&result.collected_info);

    let previous_state = ctx.state;
    let mut response = result.response.clone();

    if !emergency_matches.is_empty() {
        let phrases = emergency::matched_phrases(&emergency_matches);
        tracing::warn!(
            matches = ?phrases,
            categories = ?emergency::matched_categories(&emergency_matches),
            "emergency keywords detected"
        );
        ctx.escalate_emergency();
        if !result.is_emergency {
            response = emergency_response(&phrases, &ctx);
        }
    } else if result.is_emergency || result.severity == Some(Severity::Critical) {
        tracing::warn!("generation service flagged an emergency");
        ctx.escalate_emergency();
    } else if detect_intent_switch(ctx.state, result.intent) {
        if let Some(target) = resolve_intent_switch(result.intent) {
            tracing::info!(
                intent = result.intent.as_str(),
                from = ctx.state.as_str(),
                to = target.as_str(),
                "intent switch"
            );
            ctx.state = target;
        }
    } else if let Some(suggested) = result.suggested_next_state {
        if is_valid_transition(ctx.state, suggested) {
            ctx.state = suggested;
        } else {
            tracing::warn!(
                from = ctx.state.as_str(),
                to = suggested.as_str(),
                "ignoring invalid state transition"
            );
        }
    }

    if ctx.state == ConversationState::BookingConfirmation {
        response = handle_booking(state.appointments.as_ref(), response, &mut ctx);
    }

    let response = sanitize_response(&response, &result);

    ctx.push_message(Role::Assistant, &response, limits.max_history);

    tracing::info!(
        intent = result.intent.as_str(),
        from = previous_state.as_str(),
        state = ctx.state.as_str(),
        symptoms = ctx.symptoms.len(),
        "processed turn"
    );

    (response, ctx)
}

pub fn reset_session(previous: SessionContext) -> SessionContext {
    tracing::info!(state = previous.state.as_str(), "conversation reset");
    SessionContext::new()
}

pub fn get_greeting() -> &'static str {
    "👋 **Hello! Welcome to HealthAssist.**\n\n\
     I'm your healthcare triage assistant. I can help you:\n\n\
     - 🔍 **Assess your symptoms** and determine their severity\n\
     - 🏥 **Recommend the right department** for your needs\n\
     - 📅 **Book an appointment** with the appropriate specialist\n\n\
     ⚠️ *If you're experiencing a life-threatening emergency, \
     please call **911** or **112** immediately.*\n\n\
     **How can I help you today?** Please describe your symptoms or concern."
}

fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

pub fn detect_intent_switch(current: ConversationState, intent: Intent) -> bool {
    use ConversationState::*;
    match intent {
        Intent::SymptomReport => matches!(
            current,
            CollectingDetails | BookingConfirmation | AppointmentOffer
        ),
        Intent::BookingRequest => matches!(current, SymptomCollection | SeverityAssessment),
        Intent::Cancellation => matches!(current, CollectingDetails | BookingConfirmation),
        _ => false,
    }
}

pub fn resolve_intent_switch(intent: Intent) -> Option<ConversationState> {
    match intent {
        Intent::SymptomReport => Some(ConversationState::SymptomCollection),
        Intent::BookingRequest => Some(ConversationState::AppointmentOffer),
        Intent::Cancellation => Some(ConversationState::Completed),
        Intent::Greeting => Some(ConversationState::Greeting),
        _ => None,
    }
}

fn emergency_response(matches: &[&str], ctx: &SessionContext) -> String {
    let described = if ctx.symptoms.is_empty() {
        matches.iter().take(3).copied().collect::<Vec<_>>().join(", ")
    } else {
        ctx.symptoms.join(", ")
    };

    format!(
        "🚨 **EMERGENCY ALERT** 🚨\n\n\
         Based on what you've described (**{described}**), \
         this appears to be a **critical medical emergency**.\n\n\
         ### ⚡ Immediate Actions Required:\n\n\
         1. **Call emergency services NOW**: Dial **911** (US) or **112** (EU/India)\n\
         2. **Do not wait**, seek immediate medical attention\n\
         3. If someone is with you, ask them to help while you call\n\n\
         ### 🚫 Important:\n\
         - I **cannot** book a regular appointment for emergency conditions\n\
         - Emergency cases need **immediate in-person medical care**\n\
         - Please go to the nearest **Emergency Room (ER)** if you can\n\n\
         ---\n\
         *Once you are safe, feel free to start a new conversation \
         for any non-emergency health concerns.*"
    )
}
