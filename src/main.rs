use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use healthassist::config::AppConfig;
use healthassist::db;
use healthassist::errors::AppError;
use healthassist::handlers;
use healthassist::services::ai::gemini::GeminiProvider;
use healthassist::services::ai::groq::GroqProvider;
use healthassist::services::ai::ollama::OllamaProvider;
use healthassist::services::ai::LlmProvider;
use healthassist::services::appointments::sqlite::SqliteAppointmentStore;
use healthassist::services::appointments::{AppointmentStore, DisconnectedAppointmentStore};
use healthassist::state::AppState;

fn build_llm(config: &AppConfig) -> Result<Box<dyn LlmProvider>, AppError> {
    let settings = config.generation;
    let timeout = config.llm_timeout_secs;

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "gemini" => {
            if config.google_api_key.is_empty() {
                return Err(AppError::Config(
                    "GOOGLE_API_KEY must be set when LLM_PROVIDER=gemini".to_string(),
                ));
            }
            tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);
            Box::new(GeminiProvider::new(
                config.google_api_key.clone(),
                config.gemini_model.clone(),
                settings,
                timeout,
            ))
        }
        "groq" => {
            if config.groq_api_key.is_empty() {
                return Err(AppError::Config(
                    "GROQ_API_KEY must be set when LLM_PROVIDER=groq".to_string(),
                ));
            }
            tracing::info!("using Groq LLM provider (model: {})", config.groq_model);
            Box::new(GroqProvider::new(
                config.groq_api_key.clone(),
                config.groq_model.clone(),
                settings,
                timeout,
            ))
        }
        "ollama" => {
            tracing::info!("using Ollama LLM provider (url: {})", config.ollama_url);
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
                settings,
                timeout,
            ))
        }
        other => {
            return Err(AppError::Config(format!(
                "unknown LLM_PROVIDER '{other}' (expected gemini, groq or ollama)"
            )))
        }
    };

    Ok(llm)
}

fn build_store(config: &AppConfig) -> Box<dyn AppointmentStore> {
    if !config.persistence_enabled() {
        tracing::warn!("DATABASE_URL is empty, appointments will not be persisted");
        return Box::new(DisconnectedAppointmentStore);
    }

    match db::init_db(&config.database_url) {
        Ok(conn) => {
            tracing::info!("appointment store ready ({})", config.database_url);
            Box::new(SqliteAppointmentStore::new(conn))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to open appointment database, continuing without persistence");
            Box::new(DisconnectedAppointmentStore)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let llm = build_llm(&config)?;
    let appointments = build_store(&config);

    let state = Arc::new(AppState {
        config: config.clone(),
        llm,
        appointments,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/greeting", get(handlers::chat::greeting))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/reset", post(handlers::chat::reset))
        .route("/api/status", post(handlers::chat::status))
        .route(
            "/api/appointments",
            get(handlers::appointments::list_appointments),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointments::get_appointment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
