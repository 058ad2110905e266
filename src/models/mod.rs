pub mod booking;
pub mod conversation;
pub mod intent;

pub use booking::{short_booking_id, AppointmentRecord, AppointmentSnapshot, DEFAULT_DEPARTMENT};
pub use conversation::{
    AppointmentDetails, ConversationMessage, ConversationState, Role, SessionContext, Severity,
};
pub use intent::{CollectedInfo, Intent, TriageResult};
