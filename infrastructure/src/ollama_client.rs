use crate::config::Config;
use domain::errors::EmbeddingError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
    done: bool,
}

/// HTTP client for the external Ollama endpoint: embeddings for the
/// retriever, chat completion for answer synthesis.
#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: config.ollama_base_url.clone(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.model_id().to_string(),
        }
    }

    /// Embed one text. Failures surface as `QueryEmbeddingFailed` and are
    /// never retried here.
    pub async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            prompt: text.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::QueryEmbeddingFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::QueryEmbeddingFailed(format!(
                "{status}: {body}"
            )));
        }
        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::QueryEmbeddingFailed(e.to_string()))?;
        Ok(embedding_response.embedding)
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("Ollama API error: {}", text));
        }
        // Responses may arrive as one JSON object or newline-delimited
        // fragments; collect message content until done.
        let mut full_content = String::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(chat_resp) = serde_json::from_str::<ChatResponse>(line) {
                full_content.push_str(&chat_resp.message.content);
                if chat_resp.done {
                    break;
                }
            }
        }
        Ok(full_content)
    }
}
