//! Cached request/response pairs.
//!
//! Entries are keyed by (generation, absolute URL). Writes are plain upserts;
//! concurrent writers for the same URL resolve as last-write-wins.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

/// A stored response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> Result<(CachedEntry, String), rusqlite::Error> {
    let headers_json: String = row.get(3)?;
    let entry = CachedEntry {
        url: row.get(0)?,
        status: row.get::<_, i64>(1)? as u16,
        content_type: row.get(2)?,
        headers: Vec::new(),
        body: row.get(4)?,
        stored_at: row.get(5)?,
    };
    Ok((entry, headers_json))
}

fn decode_headers(mut entry: CachedEntry, headers_json: &str) -> Result<CachedEntry, Error> {
    entry.headers = serde_json::from_str(headers_json)
        .map_err(|e| Error::CorruptEntry(format!("{}: headers: {e}", entry.url)))?;
    Ok(entry)
}

impl CacheDb {
    /// Store `entry` in `generation`, replacing any entry for the same URL.
    ///
    /// The generation must already exist.
    pub async fn put_entry(&self, generation: &str, entry: &CachedEntry) -> Result<(), Error> {
        let generation = generation.to_string();
        let entry = entry.clone();
        let headers_json = serde_json::to_string(&entry.headers)
            .map_err(|e| Error::InvalidInput(format!("failed to encode headers: {e}")))?;

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (generation, url, status, content_type, headers_json, body, stored_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    ON CONFLICT(generation, url) DO UPDATE SET
                        status = excluded.status,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        generation,
                        entry.url,
                        entry.status as i64,
                        entry.content_type,
                        headers_json,
                        entry.body,
                        entry.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up `url` in exactly one generation.
    pub async fn get_entry(&self, generation: &str, url: &str) -> Result<Option<CachedEntry>, Error> {
        let generation = generation.to_string();
        let url = url.to_string();
        let found = self
            .conn
            .call(move |conn| -> Result<Option<(CachedEntry, String)>, Error> {
                conn.query_row(
                    "SELECT url, status, content_type, headers_json, body, stored_at
                     FROM entries WHERE generation = ?1 AND url = ?2",
                    params![generation, url],
                    entry_from_row,
                )
                .optional()
                .map_err(Error::from)
            })
            .await
            .map_err(Error::from)?;

        found.map(|(entry, headers)| decode_headers(entry, &headers)).transpose()
    }

    /// Look up `url` across every stored generation.
    ///
    /// `preferred` is searched first, then the remaining generations from
    /// newest to oldest. Outside the window between an install and its
    /// activate there is only one generation, so this is a plain lookup.
    pub async fn match_entry(&self, url: &str, preferred: &str) -> Result<Option<CachedEntry>, Error> {
        let url = url.to_string();
        let preferred = preferred.to_string();
        let found = self
            .conn
            .call(move |conn| -> Result<Option<(CachedEntry, String)>, Error> {
                conn.query_row(
                    "SELECT e.url, e.status, e.content_type, e.headers_json, e.body, e.stored_at
                     FROM entries e JOIN generations g ON g.name = e.generation
                     WHERE e.url = ?1
                     ORDER BY (e.generation = ?2) DESC, g.created_at DESC
                     LIMIT 1",
                    params![url, preferred],
                    entry_from_row,
                )
                .optional()
                .map_err(Error::from)
            })
            .await
            .map_err(Error::from)?;

        found.map(|(entry, headers)| decode_headers(entry, &headers)).transpose()
    }

    /// URLs stored in `generation`, sorted.
    pub async fn entry_urls(&self, generation: &str) -> Result<Vec<String>, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE generation = ?1 ORDER BY url")?;
                let urls = stmt.query_map(params![generation], |row| row.get(0))?;
                urls.collect::<Result<Vec<String>, _>>().map_err(Error::from)
            })
            .await
            .map_err(Error::from)
    }
}
