use crate::corpus::Corpus;
use domain::errors::RetrieveError;
use domain::models::{Query, RetrievalResult, ScoredPassage};

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product / (norm_a * norm_b)
}

/// Ranks corpus passages against a query by cosine similarity. Owns its
/// corpus; retrieval never mutates it, so repeated calls with identical
/// input return identical results.
pub struct Retriever {
    corpus: Corpus,
}

impl Retriever {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Top-k passages by descending score, ties broken by ascending
    /// passage id. Saturates when k exceeds the corpus size.
    pub fn retrieve(
        &self,
        query: &Query,
        k: usize,
    ) -> std::result::Result<RetrievalResult, RetrieveError> {
        if k == 0 {
            return Err(RetrieveError::InvalidTopK);
        }
        // A corpus with nothing embedded has nothing retrievable.
        if self.corpus.is_empty() || self.corpus.embedded_count() == 0 {
            return Err(RetrieveError::EmptyCorpus);
        }
        if let Some(expected) = self.corpus.dimension() {
            if expected != query.embedding.len() {
                return Err(RetrieveError::DimensionMismatch {
                    expected,
                    actual: query.embedding.len(),
                });
            }
        }

        let mut scored: Vec<ScoredPassage> = self
            .corpus
            .passages()
            .iter()
            .filter_map(|passage| {
                let vector = passage.embedding.as_ref()?;
                Some(ScoredPassage {
                    passage: passage.clone(),
                    score: cosine_similarity(&query.embedding, vector),
                })
            })
            .collect();

        // total_cmp keeps the ordering defined even for NaN scores.
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.passage.id.cmp(&b.passage.id))
        });
        scored.truncate(k);

        Ok(RetrievalResult { hits: scored })
    }
}
