// src/statutes.rs
// Statute section search backed by an on-disk FTS5 index. Search is
// fail-soft: a blank query or index trouble yields no hits, never an
// error.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VakilError};

pub const DEFAULT_TOP_K: usize = 3;

const INDEX_FILE_NAME: &str = "sections.db";

/// Where the statute index lives. Read from PERSIST_DIRECTORY_PATH and
/// IPC_COLLECTION_NAME; both are required.
#[derive(Debug, Clone)]
pub struct StatuteStoreConfig {
    pub persist_directory: PathBuf,
    pub collection_name: String,
}

impl StatuteStoreConfig {
    pub fn from_env() -> Result<Self> {
        let persist = std::env::var("PERSIST_DIRECTORY_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let collection = std::env::var("IPC_COLLECTION_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty());

        match (persist, collection) {
            (Some(persist), Some(collection)) => Ok(Self {
                persist_directory: PathBuf::from(persist),
                collection_name: collection,
            }),
            _ => Err(VakilError::ConfigError(
                "PERSIST_DIRECTORY_PATH or IPC_COLLECTION_NAME not set".to_string(),
            )),
        }
    }
}

/// One statute section: identifying metadata plus the searchable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub section: String,
    pub section_title: String,
    pub chapter: String,
    pub chapter_title: String,
    pub content: String,
}

pub struct SectionIndex {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

impl std::fmt::Debug for SectionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionIndex")
            .field("conn", &"Arc<Mutex<Connection>>")
            .field("table", &self.table)
            .finish()
    }
}

impl SectionIndex {
    /// Opens (creating if needed) the index under the persist
    /// directory. The collection name becomes the FTS5 table name, so
    /// it is restricted to identifier characters.
    pub fn open(config: &StatuteStoreConfig) -> Result<Self> {
        let table = table_name(&config.collection_name)?;
        std::fs::create_dir_all(&config.persist_directory)?;
        let conn = Connection::open(config.persist_directory.join(INDEX_FILE_NAME))?;

        // Section and chapter numbers are metadata; titles and content
        // carry the searchable text.
        conn.execute(
            &format!(
                "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5(
                    section UNINDEXED,
                    section_title,
                    chapter UNINDEXED,
                    chapter_title,
                    content
                )",
                table
            ),
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table,
        })
    }

    pub fn insert(&self, entry: &SectionEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO {} (section, section_title, chapter, chapter_title, content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                self.table
            ),
            params![
                entry.section,
                entry.section_title,
                entry.chapter,
                entry.chapter_title,
                entry.content
            ],
        )?;
        Ok(())
    }

    /// Loads a JSON array of section entries into the index. Returns
    /// how many were inserted.
    pub fn ingest_json(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<SectionEntry> = serde_json::from_str(&raw)?;
        for entry in &entries {
            self.insert(entry)?;
        }
        info!(count = entries.len(), path = %path.display(), "ingested statute sections");
        Ok(entries.len())
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Returns the best matches for a natural-language query, most
    /// relevant first. Blank queries and index trouble come back as no
    /// results rather than errors. An AND match runs first; when it
    /// finds nothing, the terms are retried joined with OR.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SectionEntry> {
        let clean = sanitize_match_query(query);
        if clean.is_empty() {
            warn!("empty statute query");
            return Vec::new();
        }

        match self.run_match(&clean, top_k) {
            Ok(hits) if !hits.is_empty() => hits,
            Ok(_) if clean.contains(' ') => {
                let or_query = clean
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" OR ");
                match self.run_match(&or_query, top_k) {
                    Ok(hits) => hits,
                    Err(e) => {
                        warn!(error = %e, "statute OR search failed");
                        Vec::new()
                    }
                }
            }
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "statute search failed");
                Vec::new()
            }
        }
    }

    fn run_match(&self, match_query: &str, limit: usize) -> Result<Vec<SectionEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT section, section_title, chapter, chapter_title, content
             FROM {} WHERE {} MATCH ?1 ORDER BY rank LIMIT ?2",
            self.table, self.table
        ))?;

        let rows = stmt.query_map(params![match_query, limit as i64], |row| {
            Ok(SectionEntry {
                section: row.get(0)?,
                section_title: row.get(1)?,
                chapter: row.get(2)?,
                chapter_title: row.get(3)?,
                content: row.get(4)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}

/// Strips everything FTS5 could mistake for syntax and collapses
/// whitespace.
fn sanitize_match_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The collection name doubles as the FTS5 table name, so it must be a
/// plain identifier.
fn table_name(collection_name: &str) -> Result<String> {
    let valid_start = collection_name
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    let valid_rest = collection_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest {
        Ok(collection_name.to_string())
    } else {
        Err(VakilError::ConfigError(format!(
            "invalid collection name '{}'",
            collection_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sections() -> Vec<SectionEntry> {
        vec![
            SectionEntry {
                section: "378".to_string(),
                section_title: "Theft".to_string(),
                chapter: "XVII".to_string(),
                chapter_title: "Of Offences Against Property".to_string(),
                content: "Whoever, intending to take dishonestly any movable property out of \
                          the possession of any person without that person's consent, moves \
                          that property in order to such taking, is said to commit theft."
                    .to_string(),
            },
            SectionEntry {
                section: "420".to_string(),
                section_title: "Cheating and dishonestly inducing delivery of property".to_string(),
                chapter: "XVII".to_string(),
                chapter_title: "Of Offences Against Property".to_string(),
                content: "Whoever cheats and thereby dishonestly induces the person deceived \
                          to deliver any property to any person shall be punished."
                    .to_string(),
            },
            SectionEntry {
                section: "302".to_string(),
                section_title: "Punishment for murder".to_string(),
                chapter: "XVI".to_string(),
                chapter_title: "Of Offences Affecting the Human Body".to_string(),
                content: "Whoever commits murder shall be punished with death or imprisonment \
                          for life, and shall also be liable to fine."
                    .to_string(),
            },
        ]
    }

    fn temp_index() -> (tempfile::TempDir, SectionIndex) {
        let dir = tempfile::tempdir().unwrap();
        let config = StatuteStoreConfig {
            persist_directory: dir.path().to_path_buf(),
            collection_name: "ipc_sections".to_string(),
        };
        let index = SectionIndex::open(&config).unwrap();
        for entry in sample_sections() {
            index.insert(&entry).unwrap();
        }
        (dir, index)
    }

    #[test]
    fn finds_the_matching_section_first() {
        let (_dir, index) = temp_index();
        let hits = index.search("theft", DEFAULT_TOP_K);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].section, "378");
    }

    #[test]
    fn blank_query_returns_nothing() {
        let (_dir, index) = temp_index();
        assert!(index.search("", DEFAULT_TOP_K).is_empty());
        assert!(index.search("   ", DEFAULT_TOP_K).is_empty());
        assert!(index.search("?!#", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn unmatched_query_returns_nothing() {
        let (_dir, index) = temp_index();
        assert!(index.search("maritime salvage", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn broken_index_returns_nothing_instead_of_panicking() {
        let (dir, index) = temp_index();
        assert!(!index.search("theft", DEFAULT_TOP_K).is_empty());

        // A second connection drops the table out from under the index.
        let second = Connection::open(dir.path().join(INDEX_FILE_NAME)).unwrap();
        second.execute("DROP TABLE ipc_sections", []).unwrap();

        assert!(index.search("theft", DEFAULT_TOP_K).is_empty());
        assert!(index.search("theft trespass", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn or_fallback_recovers_partial_matches() {
        let (_dir, index) = temp_index();
        // No row contains every term, so the AND pass finds nothing.
        let hits = index.search("theft trespass", DEFAULT_TOP_K);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].section, "378");
    }

    #[test]
    fn top_k_limits_the_hit_count() {
        let (_dir, index) = temp_index();
        let hits = index.search("property", 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn index_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StatuteStoreConfig {
            persist_directory: dir.path().to_path_buf(),
            collection_name: "ipc_sections".to_string(),
        };
        {
            let index = SectionIndex::open(&config).unwrap();
            for entry in sample_sections() {
                index.insert(&entry).unwrap();
            }
        }
        let reopened = SectionIndex::open(&config).unwrap();
        assert_eq!(reopened.count().unwrap(), 3);
        assert_eq!(reopened.search("murder", 1)[0].section, "302");
    }

    #[test]
    fn ingest_reads_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let config = StatuteStoreConfig {
            persist_directory: dir.path().to_path_buf(),
            collection_name: "ipc_sections".to_string(),
        };
        let index = SectionIndex::open(&config).unwrap();

        let json_path = dir.path().join("sections.json");
        std::fs::write(
            &json_path,
            serde_json::to_string(&sample_sections()).unwrap(),
        )
        .unwrap();

        let inserted = index.ingest_json(&json_path).unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(index.count().unwrap(), 3);
    }

    #[test]
    fn config_requires_both_env_values() {
        // Nothing else in the crate reads these two variables, so the
        // test owns them for its whole body.
        std::env::remove_var("PERSIST_DIRECTORY_PATH");
        std::env::remove_var("IPC_COLLECTION_NAME");
        assert!(StatuteStoreConfig::from_env().is_err());

        std::env::set_var("PERSIST_DIRECTORY_PATH", "/tmp/sections");
        assert!(StatuteStoreConfig::from_env().is_err());

        std::env::set_var("IPC_COLLECTION_NAME", "ipc_sections");
        let config = StatuteStoreConfig::from_env().unwrap();
        assert_eq!(config.collection_name, "ipc_sections");

        std::env::remove_var("PERSIST_DIRECTORY_PATH");
        std::env::remove_var("IPC_COLLECTION_NAME");
    }

    #[test]
    fn collection_name_must_be_an_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let config = StatuteStoreConfig {
            persist_directory: dir.path().to_path_buf(),
            collection_name: "ipc; DROP TABLE users".to_string(),
        };
        assert!(SectionIndex::open(&config).is_err());
    }
}
