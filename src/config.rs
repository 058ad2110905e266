use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub llm_provider: String,
    pub google_api_key: String,
    pub gemini_model: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub llm_timeout_secs: u64,
    pub generation: GenerationSettings,
    pub limits: ConversationLimits,
}

/// Sampling parameters sent with every generation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            max_output_tokens: 1024,
        }
    }
}

/// Per-session bounds enforced by the turn pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConversationLimits {
    pub max_turns: usize,
    pub max_message_chars: usize,
    pub max_history: usize,
}

impl Default for ConversationLimits {
    fn default() -> Self {
        Self {
            max_turns: 50,
            max_message_chars: 2000,
            max_history: 24,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = ConversationLimits::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "healthassist.db".to_string()),
            llm_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string()),
            google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            generation: GenerationSettings::default(),
            limits: ConversationLimits {
                max_turns: env::var("MAX_CONVERSATION_TURNS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_turns),
                ..defaults
            },
        }
    }

    pub fn persistence_enabled(&self) -> bool {
        !self.database_url.trim().is_empty()
    }
}
