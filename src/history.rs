//! Persistent correction history.
//!
//! Every human decision is appended as one row. Nothing is ever updated in
//! place: repeated rows for the same `(error, correction)` pair are votes,
//! and ranking is done by counting them.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::path::Path;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS corrections (
    id INTEGER PRIMARY KEY,
    error TEXT,
    correction TEXT,
    context TEXT,
    source TEXT,
    auto INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS corrections_correction_idx ON corrections(correction);
CREATE INDEX IF NOT EXISTS corrections_error_idx ON corrections(error);
"#;

/// One stored correction, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRecord {
    pub error: String,
    /// Empty means the error was removed.
    pub correction: String,
    pub context: String,
    pub source: String,
    /// Eligible for silent re-application in later runs.
    pub auto: bool,
}

/// Historical corrections for one error, grouped and counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedSuggestion {
    pub correction: String,
    pub count: u32,
}

/// Summary numbers for `ocrfix stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub records: u64,
    pub auto_records: u64,
    pub distinct_errors: u64,
}

/// SQLite-backed correction history. One connection per run.
pub struct CorrectionHistory {
    conn: Connection,
}

impl std::fmt::Debug for CorrectionHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectionHistory").finish_non_exhaustive()
    }
}

impl CorrectionHistory {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened correction history");
        Self::init(conn)
    }

    /// Throwaway store, used for dry runs without a database and in tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        let history = Self { conn };
        history.migrate_auto_column()?;
        Ok(history)
    }

    /// Databases created before the `auto` flag existed lack the column.
    fn migrate_auto_column(&self) -> Result<()> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(corrections)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if !columns.iter().any(|c| c == "auto") {
            tracing::info!("adding auto column to corrections table");
            self.conn.execute(
                "ALTER TABLE corrections ADD COLUMN auto INTEGER NOT NULL DEFAULT 0",
                [],
            )?;
        }
        Ok(())
    }

    /// Append one correction.
    pub fn record_correction(
        &self,
        error: &str,
        correction: &str,
        context: &str,
        source: &str,
        auto: bool,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO corrections (error, correction, context, source, auto)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![error, correction, context, source, auto],
        )?;
        Ok(())
    }

    /// Append a prepared record.
    pub fn record(&self, record: &CorrectionRecord) -> Result<()> {
        self.record_correction(
            &record.error,
            &record.correction,
            &record.context,
            &record.source,
            record.auto,
        )
    }

    /// Past corrections of `error`, most frequent first, ties alphabetical.
    pub fn suggestions_for(&self, error: &str) -> Result<Vec<AggregatedSuggestion>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT correction, COUNT(error) AS count
             FROM corrections
             WHERE error = ?1
             GROUP BY correction
             ORDER BY count DESC, correction ASC",
        )?;
        let rows = stmt.query_map([error], |row| {
            Ok(AggregatedSuggestion {
                correction: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Corrections chosen at least `min_count` times across all errors.
    pub fn promoted_corrections(&self, min_count: u32) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT correction
             FROM corrections
             GROUP BY correction
             HAVING COUNT(error) >= ?1
             ORDER BY correction ASC",
        )?;
        let rows = stmt.query_map([min_count], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The correction to apply silently for `error`, if any decision on it
    /// was marked auto. Matching is exact and case-sensitive.
    pub fn auto_correction_for(&self, error: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT correction
             FROM corrections
             WHERE error = ?1 AND auto = 1
             GROUP BY correction
             ORDER BY COUNT(error) DESC, correction ASC
             LIMIT 1",
        )?;
        Ok(stmt.query_row([error], |row| row.get(0)).optional()?)
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM corrections", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn stats(&self) -> Result<HistoryStats> {
        let (records, auto_records, distinct_errors): (i64, i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(auto), 0), COUNT(DISTINCT error) FROM corrections",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(HistoryStats {
            records: records.max(0) as u64,
            auto_records: auto_records.max(0) as u64,
            distinct_errors: distinct_errors.max(0) as u64,
        })
    }

    /// Drop every record and recreate the empty schema. Irreversible.
    ///
    /// Returns how many records were deleted.
    pub fn reset(&self) -> Result<u64> {
        let deleted = self.len()?;
        self.conn.execute_batch("DROP TABLE IF EXISTS corrections;")?;
        self.conn.execute_batch(SCHEMA)?;
        tracing::info!(deleted, "correction history reset");
        Ok(deleted)
    }
}
