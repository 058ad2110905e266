use crate::models::ConversationState;
use crate::models::ConversationState::*;

pub fn allowed_transitions(current: ConversationState) -> &'static [ConversationState] {
    match current {
        Greeting => &[SymptomCollection, Emergency],
        SymptomCollection => &[SymptomCollection, SeverityAssessment, Emergency],
        SeverityAssessment => &[Emergency, DepartmentRecommendation, SymptomCollection],
        Emergency => &[Emergency, Greeting],
        DepartmentRecommendation => &[AppointmentOffer, SymptomCollection, Emergency],
        AppointmentOffer => &[CollectingDetails, Completed, SymptomCollection, Emergency],
        CollectingDetails => &[CollectingDetails, BookingConfirmation, Emergency],
        BookingConfirmation => &[Completed, CollectingDetails, Emergency],
        Completed => &[Greeting, SymptomCollection],
    }
}

pub fn is_valid_transition(current: ConversationState, next: ConversationState) -> bool {
    next == Emergency || allowed_transitions(current).contains(&next)
}

/// Same check over raw state names. An unrecognized `current` has no legal
/// destinations other than emergency; an unrecognized `next` is never legal.
pub fn is_valid_transition_name(current: &str, next: &str) -> bool {
    let Some(next) = ConversationState::parse(next) else {
        return false;
    };
    match ConversationState::parse(current) {
        Some(current) => is_valid_transition(current, next),
        None => next == Emergency,
    }
}
