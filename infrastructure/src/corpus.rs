use domain::errors::RetrieveError;
use domain::models::{ManualPage, Passage};
use shared::types::Result;
use std::fs;
use std::path::{Path, PathBuf};

// Pages longer than this are split into overlapping chunks so a single
// dense page cannot crowd the context window.
const MAX_PAGE_BYTES: usize = 2000;
const CHUNK_SIZE: usize = 1000;
const CHUNK_OVERLAP: usize = 200;

/// Read-only access to the pre-processed manual directory
/// (`<data_dir>/<manual>/content.json` plus `page_<n>.png` images).
/// Producing that directory is the ingestion pipeline's job, not ours.
pub struct ManualStore {
    data_dir: PathBuf,
}

impl ManualStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Manuals available for querying: one subdirectory each. A missing
    /// data directory is an empty catalogue, not an error.
    pub fn available_manuals(&self) -> Result<Vec<String>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }
        let mut manuals = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    manuals.push(name.to_string());
                }
            }
        }
        manuals.sort();
        Ok(manuals)
    }

    /// Load a manual's content.json into passages. Page order and page
    /// numbers come straight from the ingestion output.
    pub fn load_manual(&self, manual: &str) -> Result<Vec<Passage>> {
        let json_path = self.data_dir.join(manual).join("content.json");
        let raw = fs::read_to_string(&json_path).map_err(|e| {
            anyhow::anyhow!(
                "could not read '{}' for manual '{}' (did ingestion run?): {}",
                json_path.display(),
                manual,
                e
            )
        })?;
        let pages: Vec<ManualPage> = serde_json::from_str(&raw)?;
        let mut passages = Vec::with_capacity(pages.len());
        for page in &pages {
            for (i, chunk) in chunk_page(&page.content).into_iter().enumerate() {
                passages.push(Passage::new(manual, page.page, i, chunk));
            }
        }
        Ok(passages)
    }

    pub fn page_image_path(&self, manual: &str, page: u32) -> PathBuf {
        self.data_dir.join(manual).join(format!("page_{page}.png"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Split one page into retrieval-sized chunks. Short pages stay whole;
/// long ones get fixed-size overlapping windows cut on UTF-8 boundaries.
fn chunk_page(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.len() <= MAX_PAGE_BYTES {
        return vec![trimmed.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < trimmed.len() {
        let mut end = (start + CHUNK_SIZE).min(trimmed.len());
        while end < trimmed.len() && !trimmed.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(trimmed[start..end].to_string());
        if end == trimmed.len() {
            break;
        }
        let mut next_start = end.saturating_sub(CHUNK_OVERLAP);
        while next_start > 0 && !trimmed.is_char_boundary(next_start) {
            next_start -= 1;
        }
        start = next_start;
    }
    chunks
}

/// An immutable, fully-loaded corpus. Constructed once per manual; the
/// retriever owns it and nothing mutates it afterwards, so concurrent
/// readers need no synchronization.
#[derive(Debug, Clone)]
pub struct Corpus {
    passages: Vec<Passage>,
    dimension: Option<usize>,
}

impl Corpus {
    /// Build a corpus, rejecting mixed embedding dimensionalities up
    /// front so the mismatch cannot silently skew scores at query time.
    pub fn new(passages: Vec<Passage>) -> std::result::Result<Self, RetrieveError> {
        let mut dimension = None;
        for passage in &passages {
            if let Some(vector) = &passage.embedding {
                match dimension {
                    None => dimension = Some(vector.len()),
                    Some(expected) if expected != vector.len() => {
                        return Err(RetrieveError::DimensionMismatch {
                            expected,
                            actual: vector.len(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(Self {
            passages,
            dimension,
        })
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Dimension of the embedding space, if any passage is embedded.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn embedded_count(&self) -> usize {
        self.passages
            .iter()
            .filter(|p| p.embedding.is_some())
            .count()
    }
}
