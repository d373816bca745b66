use rusqlite::{params, Connection, Result as SqlResult};
use shared::types::Result;
use std::path::Path;

/// Persistent cache of passage embeddings. Keyed by passage id plus a
/// content hash and the model id, so edited pages and model switches
/// both invalidate stale vectors.
pub struct EmbeddingCache {
    conn: Connection,
}

pub struct CachedEmbedding {
    pub id: String,
    pub hash: String,
    pub vector: Vec<f32>,
}

impl EmbeddingCache {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        Self::setup_db(&conn)?;
        Ok(Self { conn })
    }

    fn setup_db(conn: &Connection) -> SqlResult<()> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            CREATE TABLE IF NOT EXISTS passage_embeddings (
                id TEXT NOT NULL,
                hash TEXT NOT NULL,
                model TEXT NOT NULL,
                vector BLOB NOT NULL,
                PRIMARY KEY (id, model)
            );
        ",
        )?;
        Ok(())
    }

    /// Cached vector for a passage, or None when absent or stale.
    pub fn get(&self, id: &str, hash: &str, model: &str) -> Result<Option<Vec<f32>>> {
        let mut stmt = self.conn.prepare(
            "SELECT hash, vector FROM passage_embeddings WHERE id = ?1 AND model = ?2",
        )?;
        let mut rows = stmt.query(params![id, model])?;
        if let Some(row) = rows.next()? {
            let stored_hash: String = row.get(0)?;
            if stored_hash == hash {
                let vector_bytes: Vec<u8> = row.get(1)?;
                let vector: Vec<f32> = serde_json::from_slice(&vector_bytes)?;
                return Ok(Some(vector));
            }
        }
        Ok(None)
    }

    pub fn put_batch(&self, entries: &[CachedEmbedding], model: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO passage_embeddings (id, hash, model, vector)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                let vector_bytes = serde_json::to_vec(&entry.vector)?;
                stmt.execute(params![entry.id, entry.hash, model, vector_bytes])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Content hash used for cache invalidation.
pub fn content_hash(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}
