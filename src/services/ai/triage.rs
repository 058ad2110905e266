use crate::models::{SessionContext, TriageResult};
use crate::services::ai::prompt::{build_context_prompt, system_prompt};
use crate::services::ai::validator::{fallback_result, parse_response};
use crate::services::ai::{LlmProvider, Message};

pub async fn generate_triage(
    llm: &dyn LlmProvider,
    ctx: &SessionContext,
    latest_message: &str,
) -> TriageResult {
    let messages = [Message {
        role: "user".to_string(),
        content: build_context_prompt(ctx, latest_message),
    }];

    match llm.chat(&system_prompt(), &messages).await {
        Ok(raw) => parse_response(&raw),
        Err(e) => {
            tracing::warn!(error = %e, "generation service call failed, using fallback");
            fallback_result()
        }
    }
}
