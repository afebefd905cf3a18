use chrono::Local;
use rusqlite::{params, Connection, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::app_dirs::AppDirs;

/// Today's key in the history tables.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Daily coding-time history, fed by the host on every accepted save.
///
/// This is an optional facility: callers hold it as `Option<HistoryDb>` and
/// recording failures are swallowed, since history must never get in the way
/// of tracking itself.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (or create) the on-disk history database.
    pub fn new() -> Result<Self> {
        let db_path = Self::get_db_path().unwrap_or_else(|| PathBuf::from("levelup_history.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(&db_path)?;
        Self::init(&conn)?;
        Ok(HistoryDb { conn })
    }

    /// In-memory database, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(HistoryDb { conn })
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS history_days (
                day TEXT PRIMARY KEY,
                seconds INTEGER NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS history_languages (
                day TEXT NOT NULL,
                language TEXT NOT NULL,
                seconds INTEGER NOT NULL,
                PRIMARY KEY (day, language)
            )
            "#,
            [],
        )?;
        Ok(())
    }

    fn get_db_path() -> Option<PathBuf> {
        AppDirs::history_db_path()
    }

    /// Add tracked seconds to a day's total.
    pub fn record_day_seconds(&self, day: &str, seconds: u64) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO history_days (day, seconds) VALUES (?1, ?2)
            ON CONFLICT(day) DO UPDATE SET seconds = seconds + excluded.seconds
            "#,
            params![day, seconds],
        )?;
        Ok(())
    }

    /// Add tracked seconds to a day's per-language row.
    pub fn record_language_seconds(&self, day: &str, language: &str, seconds: u64) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO history_languages (day, language, seconds) VALUES (?1, ?2, ?3)
            ON CONFLICT(day, language) DO UPDATE SET seconds = seconds + excluded.seconds
            "#,
            params![day, language, seconds],
        )?;
        Ok(())
    }

    /// Most recent days first.
    pub fn recent_days(&self, limit: usize) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, seconds FROM history_days ORDER BY day DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect()
    }

    /// All-time seconds per language, busiest first.
    pub fn language_totals(&self) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT language, SUM(seconds) AS total
            FROM history_languages
            GROUP BY language
            ORDER BY total DESC, language
            "#,
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect()
    }

    /// Dump the per-language history as CSV (day, language, seconds).
    pub fn export_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer
            .write_record(["day", "language", "seconds"])
            .map_err(csv_error)?;

        let mut stmt = self.conn.prepare(
            "SELECT day, language, seconds FROM history_languages ORDER BY day, language",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;
        for row in rows {
            let (day, language, seconds) = row?;
            writer
                .write_record([day, language, seconds.to_string()])
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|e| csv_error(csv::Error::from(e)))?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
        Some(e.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_totals_accumulate() {
        let db = HistoryDb::open_in_memory().unwrap();
        db.record_day_seconds("2026-08-01", 30).unwrap();
        db.record_day_seconds("2026-08-01", 30).unwrap();
        db.record_day_seconds("2026-08-02", 10).unwrap();

        let days = db.recent_days(10).unwrap();
        assert_eq!(
            days,
            vec![
                ("2026-08-02".to_string(), 10),
                ("2026-08-01".to_string(), 60)
            ]
        );
    }

    #[test]
    fn recent_days_honors_the_limit() {
        let db = HistoryDb::open_in_memory().unwrap();
        for d in 1..=5 {
            db.record_day_seconds(&format!("2026-08-0{}", d), d as u64)
                .unwrap();
        }
        let days = db.recent_days(2).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].0, "2026-08-05");
    }

    #[test]
    fn language_totals_sum_across_days() {
        let db = HistoryDb::open_in_memory().unwrap();
        db.record_language_seconds("2026-08-01", "rust", 100).unwrap();
        db.record_language_seconds("2026-08-02", "rust", 50).unwrap();
        db.record_language_seconds("2026-08-02", "go", 200).unwrap();

        let totals = db.language_totals().unwrap();
        assert_eq!(
            totals,
            vec![("go".to_string(), 200), ("rust".to_string(), 150)]
        );
    }

    #[test]
    fn export_writes_csv_rows() {
        let db = HistoryDb::open_in_memory().unwrap();
        db.record_language_seconds("2026-08-01", "rust", 90).unwrap();
        db.record_language_seconds("2026-08-01", "go", 10).unwrap();

        let mut buf = Vec::new();
        db.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("day,language,seconds"));
        assert_eq!(lines.next(), Some("2026-08-01,go,10"));
        assert_eq!(lines.next(), Some("2026-08-01,rust,90"));
    }

    #[test]
    fn today_is_an_iso_date() {
        let day = today();
        assert_eq!(day.len(), 10);
        assert_eq!(&day[4..5], "-");
        assert_eq!(&day[7..8], "-");
    }
}
