use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{http_client, LlmProvider, Message};
use crate::config::GenerationSettings;

pub struct OllamaProvider {
    url: String,
    model: String,
    settings: GenerationSettings,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String, settings: GenerationSettings, timeout_secs: u64) -> Self {
        Self {
            url,
            model,
            settings,
            client: http_client(timeout_secs),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn chat(&self, system_prompt: &str, messages: &[Message]) -> anyhow::Result<String> {
        let mut ollama_messages = vec![json!({
            "role": "system",
            "content": system_prompt,
        })];

        for msg in messages {
            ollama_messages.push(json!({
                "role": msg.role,
                "content": msg.content,
            }));
        }

        let body = json!({
            "model": self.model,
            "messages": ollama_messages,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": self.settings.temperature,
                "top_p": self.settings.top_p,
                "num_predict": self.settings.max_output_tokens,
            },
        });

        let resp = self
            .client
            .post(format!("{}/api/chat", self.url.trim_end_matches('/')))
            .json(&body)
            .send()
            .await
            .context("failed to call Ollama API")?
            .error_for_status()
            .context("Ollama API returned error")?;

        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Ollama response")?;

        data["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in Ollama response"))
    }
}
