use dotenvy::dotenv;
use std::env;

/// Embedding models the corpus can be indexed with. The query and the
/// corpus must use the same one; dimensions differ per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingModel {
    NomicEmbedText,
    AllMiniLm,
    MxbaiEmbedLarge,
}

impl EmbeddingModel {
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::NomicEmbedText => "nomic-embed-text",
            Self::AllMiniLm => "all-minilm",
            Self::MxbaiEmbedLarge => "mxbai-embed-large",
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            Self::NomicEmbedText => 768,
            Self::AllMiniLm => 384,
            Self::MxbaiEmbedLarge => 1024,
        }
    }

    fn from_env_value(value: &str) -> Option<Self> {
        match value {
            "nomic-embed-text" => Some(Self::NomicEmbedText),
            "all-minilm" => Some(Self::AllMiniLm),
            "mxbai-embed-large" => Some(Self::MxbaiEmbedLarge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub chat_model: String,
    pub embedding_model: EmbeddingModel,
    pub default_top_k: usize,
    pub data_dir: String,
    pub cache_path: String,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self {
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            chat_model: env::var("OLLAMA_CHAT_MODEL")
                .unwrap_or_else(|_| "llama3.1:8b".to_string()),
            embedding_model: env::var("OLLAMA_EMBEDDING_MODEL")
                .ok()
                .and_then(|v| EmbeddingModel::from_env_value(&v))
                .unwrap_or(EmbeddingModel::NomicEmbedText),
            default_top_k: env::var("RAG_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|k| *k > 0)
                .unwrap_or(5),
            data_dir: env::var("PROCESSED_DATA_DIR")
                .unwrap_or_else(|_| "processed_data".to_string()),
            cache_path: env::var("EMBEDDING_CACHE_PATH")
                .unwrap_or_else(|_| "embeddings.db".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_round_trip() {
        for model in [
            EmbeddingModel::NomicEmbedText,
            EmbeddingModel::AllMiniLm,
            EmbeddingModel::MxbaiEmbedLarge,
        ] {
            assert_eq!(EmbeddingModel::from_env_value(model.model_id()), Some(model));
        }
    }

    #[test]
    fn unknown_model_rejected() {
        assert_eq!(EmbeddingModel::from_env_value("gpt-9"), None);
    }
}
