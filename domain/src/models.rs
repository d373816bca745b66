use serde::{Deserialize, Serialize};

/// One page of a pre-processed manual, as stored in content.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualPage {
    pub page: u32,
    pub content: String,
}

/// A retrievable chunk of manual text. Immutable once the corpus is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// `<manual>:<page>:<chunk>` — unique within a corpus.
    pub id: String,
    pub manual: String,
    pub page: u32,
    pub text: String,
    pub embedding: Option<Vec<f32>>,
}

impl Passage {
    pub fn new(manual: &str, page: u32, chunk: usize, text: String) -> Self {
        Self {
            id: format!("{manual}:{page}:{chunk}"),
            manual: manual.to_string(),
            page,
            text,
            embedding: None,
        }
    }
}

/// Ephemeral per-request query: raw text plus its derived embedding.
#[derive(Debug, Clone)]
pub struct Query {
    pub text: String,
    pub embedding: Vec<f32>,
}

impl Query {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

/// Passages ranked by descending similarity, at most k entries.
#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    pub hits: Vec<ScoredPassage>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredPassage> {
        self.hits.iter()
    }

    /// Context block handed to the language model: page-labelled text,
    /// ranked order preserved.
    pub fn context_block(&self) -> String {
        self.hits
            .iter()
            .map(|hit| format!("Page {}:\n{}", hit.passage.page, hit.passage.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
