//! Cache generation bookkeeping.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::OptionalExtension;

/// A stored cache generation and how many entries it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GenerationInfo {
    pub name: String,
    pub manifest_fingerprint: String,
    pub created_at: String,
    pub entries: u64,
}

impl CacheDb {
    /// Open (create if missing) the generation `name`.
    ///
    /// Returns the fingerprint the generation was created with when it
    /// already existed, so callers can detect a manifest change that was not
    /// accompanied by a version bump. An existing generation keeps its
    /// original fingerprint and entries.
    pub async fn open_generation(&self, name: &str, fingerprint: &str) -> Result<Option<String>, Error> {
        let name = name.to_string();
        let fingerprint = fingerprint.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let tx = conn.transaction()?;
                let existing: Option<String> = tx
                    .query_row(
                        "SELECT manifest_fingerprint FROM generations WHERE name = ?1",
                        params![name],
                        |row| row.get(0),
                    )
                    .optional()?;

                if existing.is_none() {
                    tx.execute(
                        "INSERT INTO generations (name, manifest_fingerprint, created_at) VALUES (?1, ?2, ?3)",
                        params![name, fingerprint, created_at],
                    )?;
                }
                tx.commit()?;
                Ok(existing)
            })
            .await
            .map_err(Error::from)
    }

    /// List stored generations, oldest first.
    pub async fn list_generations(&self) -> Result<Vec<GenerationInfo>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<GenerationInfo>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT g.name, g.manifest_fingerprint, g.created_at, COUNT(e.url)
                     FROM generations g
                     LEFT JOIN entries e ON e.generation = g.name
                     GROUP BY g.name
                     ORDER BY g.created_at ASC, g.name ASC",
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok(GenerationInfo {
                        name: row.get(0)?,
                        manifest_fingerprint: row.get(1)?,
                        created_at: row.get(2)?,
                        entries: row.get::<_, i64>(3)? as u64,
                    })
                })?;

                rows.collect::<Result<Vec<_>, _>>().map_err(Error::from)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a generation together with all of its entries.
    ///
    /// Returns false if no generation had that name.
    pub async fn delete_generation(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM entries WHERE generation = ?1", params![name])?;
                let deleted = tx.execute("DELETE FROM generations WHERE name = ?1", params![name])?;
                tx.commit()?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_generation_creates_once() {
        let db = CacheDb::open_in_memory().await.unwrap();

        let first = db.open_generation("kakei-shell-v1", "aaa").await.unwrap();
        assert_eq!(first, None);

        let second = db.open_generation("kakei-shell-v1", "bbb").await.unwrap();
        assert_eq!(second.as_deref(), Some("aaa"));

        let generations = db.list_generations().await.unwrap();
        assert_eq!(generations.len(), 1);
        assert_eq!(generations[0].manifest_fingerprint, "aaa");
        assert_eq!(generations[0].entries, 0);
    }

    #[tokio::test]
    async fn test_delete_generation() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_generation("kakei-shell-v1", "aaa").await.unwrap();
        db.open_generation("kakei-shell-v2", "bbb").await.unwrap();

        assert!(db.delete_generation("kakei-shell-v1").await.unwrap());
        assert!(!db.delete_generation("kakei-shell-v1").await.unwrap());

        let names: Vec<String> = db
            .list_generations()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["kakei-shell-v2".to_string()]);
    }
}
