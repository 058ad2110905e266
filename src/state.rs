use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::appointments::AppointmentStore;

pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub appointments: Box<dyn AppointmentStore>,
}
