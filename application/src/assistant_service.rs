use crate::citations::cited_pages;
use domain::models::Query;
use infrastructure::{
    config::Config,
    corpus::{Corpus, ManualStore},
    embedder::Embedder,
    embedding_cache::EmbeddingCache,
    ollama_client::OllamaClient,
    retriever::Retriever,
};
use shared::types::Result;
use std::path::PathBuf;

/// A synthesized answer plus the manual pages it cites.
#[derive(Debug)]
pub struct Answer {
    pub text: String,
    pub cited_pages: Vec<u32>,
}

pub struct AssistantService {
    store: ManualStore,
    cache: EmbeddingCache,
    embedder: Embedder,
    client: OllamaClient,
    config: Config,
}

impl AssistantService {
    pub fn new(config: Config) -> Result<Self> {
        let client = OllamaClient::new(&config);
        Ok(Self {
            store: ManualStore::new(&config.data_dir),
            cache: EmbeddingCache::open(&config.cache_path)?,
            embedder: Embedder::new(client.clone()),
            client,
            config,
        })
    }

    pub fn available_manuals(&self) -> Result<Vec<String>> {
        self.store.available_manuals()
    }

    pub fn page_image_path(&self, manual: &str, page: u32) -> PathBuf {
        self.store.page_image_path(manual, page)
    }

    pub fn default_top_k(&self) -> usize {
        self.config.default_top_k
    }

    /// Load a manual and produce a ready retriever. Embeddings come from
    /// the cache where possible, otherwise from the external endpoint.
    pub async fn index_manual(&self, manual: &str) -> Result<Retriever> {
        let mut passages = self.store.load_manual(manual)?;
        eprintln!("Loaded {} passages from '{}'", passages.len(), manual);

        let model = self.config.embedding_model.model_id();
        self.embedder
            .embed_passages(&mut passages, &self.cache, model)
            .await?;

        let corpus = Corpus::new(passages)?;
        Ok(Retriever::new(corpus))
    }

    /// Answer a question from a manual: embed the query, retrieve top-k
    /// context, ask the model, and pull out page citations.
    pub async fn ask(&self, retriever: &Retriever, question: &str) -> Result<Answer> {
        let embedding = self.client.embed(question).await?;
        let query = Query::new(question, embedding);

        let result = retriever.retrieve(&query, self.config.default_top_k)?;
        let context = result.context_block();

        let prompt = build_prompt(question, &context);
        let text = self.client.generate(&prompt).await?;
        let cited = cited_pages(&text);

        Ok(Answer {
            text,
            cited_pages: cited,
        })
    }
}

/// Prompt handed to the model. Keeps the original assistant's ground
/// rules: answer only from the supplied context and cite page numbers.
fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You are an expert assistant specialized in analyzing technical manuals \
for complex machinery like ultrasound equipment.\n\
Your task is to answer the user's question based ONLY on the provided context from the manual.\n\
After providing the answer, you MUST cite the specific page number(s) where you found the \
information.\n\
Format your citation clearly at the end of your answer, for example: \
(Source: Page 15) or (Source: Pages 28, 32).\n\n\
CONTEXT FROM MANUAL:\n{context}\n\n\
QUESTION:\n{question}\n\n\
ASSISTANT'S ANSWER:"
    )
}
