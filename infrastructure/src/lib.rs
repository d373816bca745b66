pub mod config;
pub mod corpus;
pub mod embedder;
pub mod embedding_cache;
pub mod ollama_client;
pub mod retriever;
