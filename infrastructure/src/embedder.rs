use crate::embedding_cache::{content_hash, CachedEmbedding, EmbeddingCache};
use crate::ollama_client::OllamaClient;
use domain::models::Passage;
use futures::stream::{self, StreamExt};
use shared::types::Result;

const BATCH_SIZE: usize = 32;
const CONCURRENCY: usize = 8;

/// Fills in passage embeddings, going to the external endpoint only for
/// passages the cache does not already cover.
pub struct Embedder {
    client: OllamaClient,
}

impl Embedder {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    /// Embed every passage in place. Cached vectors are reused; fresh
    /// ones are written back so the next index run is cheap.
    pub async fn embed_passages(
        &self,
        passages: &mut [Passage],
        cache: &EmbeddingCache,
        model: &str,
    ) -> Result<()> {
        let mut missing: Vec<usize> = Vec::new();
        for (i, passage) in passages.iter_mut().enumerate() {
            let hash = content_hash(&passage.text);
            if let Some(vector) = cache.get(&passage.id, &hash, model)? {
                passage.embedding = Some(vector);
            } else {
                missing.push(i);
            }
        }

        if missing.is_empty() {
            return Ok(());
        }
        eprintln!("Generating embeddings for {} passages...", missing.len());

        for batch in missing.chunks(BATCH_SIZE) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&i| {
                    let client = &self.client;
                    let text = passages[i].text.clone();
                    async move {
                        let vector = client.embed(&text).await?;
                        Ok::<_, domain::errors::EmbeddingError>((i, vector))
                    }
                })
                .collect();

            let results = stream::iter(futures)
                .buffer_unordered(CONCURRENCY)
                .collect::<Vec<_>>()
                .await;

            let mut fresh = Vec::with_capacity(batch.len());
            for result in results {
                let (i, vector) = result?;
                fresh.push(CachedEmbedding {
                    id: passages[i].id.clone(),
                    hash: content_hash(&passages[i].text),
                    vector: vector.clone(),
                });
                passages[i].embedding = Some(vector);
            }
            cache.put_batch(&fresh, model)?;
        }
        Ok(())
    }
}
