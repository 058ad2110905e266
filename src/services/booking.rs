use crate::models::{
    short_booking_id, AppointmentSnapshot, ConversationState, SessionContext, DEFAULT_DEPARTMENT,
};
use crate::services::appointments::AppointmentStore;

// Exactly one save attempt; the conversation completes either way.
pub fn handle_booking(
    store: &dyn AppointmentStore,
    response: String,
    ctx: &mut SessionContext,
) -> String {
    if !ctx.appointment.is_complete() {
        let missing = ctx.appointment.missing_fields();
        tracing::info!(?missing, "booking requested with incomplete details");
        ctx.state = ConversationState::CollectingDetails;
        return response;
    }

    let snapshot = AppointmentSnapshot::from_context(ctx);
    let department = snapshot
        .department
        .clone()
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());
    ctx.state = ConversationState::Completed;

    match store.save(&snapshot) {
        Some(booking_id) => {
            let severity = ctx.severity.map(|s| s.title()).unwrap_or("N/A");
            let reply = format!(
                "✅ **Appointment Confirmed!**\n\n\
                 📋 **Booking Details:**\n\n\
                 | Field | Details |\n\
                 |-------|--------|\n\
                 | 🆔 **Booking ID** | `{short_id}` |\n\
                 | 👤 **Patient** | {patient} |\n\
                 | 📅 **Date** | {date} |\n\
                 | 🕐 **Time** | {time} |\n\
                 | 📞 **Contact** | {contact} |\n\
                 | 🏥 **Department** | {department} |\n\
                 | ⚖️ **Severity** | {severity} |\n\n\
                 Your appointment has been saved. \
                 Please arrive **15 minutes early** and bring any relevant medical documents.\n\n\
                 Is there anything else I can help you with?",
                short_id = short_booking_id(&booking_id),
                patient = snapshot.patient_name,
                date = snapshot.preferred_date,
                time = snapshot.preferred_time,
                contact = snapshot.contact_number,
            );
            tracing::info!(booking_id = %booking_id, "appointment confirmed");
            ctx.booking_id = Some(booking_id);
            reply
        }
        None => {
            tracing::warn!("appointment could not be persisted, asking patient to confirm manually");
            format!(
                "⚠️ **Appointment Details Recorded** (booking system temporarily unavailable)\n\n\
                 📋 **Your Details:**\n\n\
                 | Field | Details |\n\
                 |-------|--------|\n\
                 | 👤 **Patient** | {patient} |\n\
                 | 📅 **Date** | {date} |\n\
                 | 🕐 **Time** | {time} |\n\
                 | 📞 **Contact** | {contact} |\n\
                 | 🏥 **Department** | {department} |\n\n\
                 Please call the hospital directly to confirm your appointment.\n\n\
                 Is there anything else I can help you with?",
                patient = snapshot.patient_name,
                date = snapshot.preferred_date,
                time = snapshot.preferred_time,
                contact = snapshot.contact_number,
            )
        }
    }
}
