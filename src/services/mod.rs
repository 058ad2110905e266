pub mod ai;
pub mod appointments;
pub mod booking;
pub mod conversation;
pub mod emergency;
pub mod knowledge;
pub mod state_machine;
pub mod status;
