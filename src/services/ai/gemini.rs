use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{http_client, LlmProvider, Message};
use crate::config::GenerationSettings;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    settings: GenerationSettings,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: String,
        settings: GenerationSettings,
        timeout_secs: u64,
    ) -> Self {
        Self {
            api_key,
            model,
            settings,
            client: http_client(timeout_secs),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn chat(&self, system_prompt: &str, messages: &[Message]) -> anyhow::Result<String> {
        let contents: Vec<serde_json::Value> = messages
            .iter()
            .map(|msg| {
                // Gemini calls the assistant side "model".
                let role = if msg.role == "assistant" { "model" } else { "user" };
                json!({
                    "role": role,
                    "parts": [{ "text": msg.content }],
                })
            })
            .collect();

        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": contents,
            "generationConfig": {
                "temperature": self.settings.temperature,
                "topP": self.settings.top_p,
                "maxOutputTokens": self.settings.max_output_tokens,
                "responseMimeType": "application/json",
            },
        });

        let resp = self
            .client
            .post(format!("{GEMINI_API_BASE}/models/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call Gemini API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Gemini response")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API error ({}): {}", status, data);
        }

        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in Gemini response"))
    }
}
