//! LibSQL storage backend implementation
//!
//! Persists feedback records in a local libSQL (SQLite-compatible) database.
//! The schema is embedded in the binary and applied on open, tracked in
//! `_migrations_applied`.

use crate::error::{CritiqueError, Result};
use crate::storage::FeedbackStore;
use crate::types::{
    truncate_to_millis, FeedbackEntry, FeedbackId, FeedbackRecord, NewFeedback, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Builder, Connection, Database};
use std::path::Path;
use tracing::{debug, error, info};

/// Embedded migrations, applied in order
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_feedback.sql",
    include_str!("../../migrations/libsql/001_feedback.sql"),
)];

/// Database connection mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Local file-based database
    Local(String),
    /// In-memory database (for testing)
    InMemory,
}

impl ConnectionMode {
    /// `":memory:"` selects an in-memory database, anything else is a file path
    pub fn from_path(database: &str) -> Self {
        if database == ":memory:" {
            ConnectionMode::InMemory
        } else {
            ConnectionMode::Local(database.to_string())
        }
    }
}

/// LibSQL storage backend
///
/// Holds a single connection for its lifetime instead of connecting per
/// operation: an in-memory database only lives as long as the connection that
/// created it, and every request must see the same one. libSQL serializes
/// statements on a shared connection, so concurrent handlers can use it.
pub struct LibsqlStorage {
    _db: Database,
    conn: Connection,
}

impl LibsqlStorage {
    /// Reject files that exist but are not SQLite databases
    fn validate_database_file(db_path: &str) -> Result<()> {
        let path = Path::new(db_path);
        if !path.exists() {
            return Ok(());
        }

        let bytes = std::fs::read(path).map_err(|e| {
            error!("Cannot read database file at '{}': {}", db_path, e);
            e
        })?;

        // Zero-length files are valid empty databases
        if !bytes.is_empty() && !bytes.starts_with(b"SQLite format 3\0") {
            return Err(CritiqueError::Database(format!(
                "Database file at '{}' is corrupted or not a valid SQLite database",
                db_path
            )));
        }

        debug!("Database file validation passed: {}", db_path);
        Ok(())
    }

    /// Open (creating if needed) and migrate the database
    ///
    /// # Example
    /// ```ignore
    /// let storage = LibsqlStorage::new(ConnectionMode::Local("critique.db".into())).await?;
    /// ```
    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        info!("Connecting to LibSQL database: {:?}", mode);

        let db = match &mode {
            ConnectionMode::Local(path) => {
                Self::validate_database_file(path)?;

                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            error!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            );
                            e
                        })?;
                    }
                }

                Builder::new_local(path).build().await.map_err(|e| {
                    CritiqueError::Database(format!("Failed to create local database: {}", e))
                })?
            }
            ConnectionMode::InMemory => Builder::new_local(":memory:").build().await.map_err(|e| {
                CritiqueError::Database(format!("Failed to create in-memory database: {}", e))
            })?,
        };

        let conn = db
            .connect()
            .map_err(|e| CritiqueError::Database(format!("Failed to get connection: {}", e)))?;

        info!("LibSQL database connection established");

        let storage = Self { _db: db, conn };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Convenience constructor for a path or `:memory:`
    pub async fn from_path(database: &str) -> Result<Self> {
        Self::new(ConnectionMode::from_path(database)).await
    }

    /// Apply any embedded migrations not yet recorded
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS _migrations_applied (
                    migration_name TEXT PRIMARY KEY,
                    applied_at INTEGER NOT NULL
                )",
                params![],
            )
            .await
            .map_err(|e| {
                CritiqueError::Migration(format!("Failed to create migrations table: {}", e))
            })?;

        for (name, sql) in MIGRATIONS {
            let already_applied = {
                let mut rows = self
                    .conn
                    .query(
                        "SELECT COUNT(*) FROM _migrations_applied WHERE migration_name = ?",
                        params![*name],
                    )
                    .await?;

                match rows.next().await? {
                    Some(row) => row.get::<i64>(0)?,
                    None => 0,
                }
            };

            if already_applied > 0 {
                debug!("Skipping already applied migration: {}", name);
                continue;
            }

            self.conn.execute_batch(sql).await.map_err(|e| {
                CritiqueError::Migration(format!("Failed to execute {}: {}", name, e))
            })?;

            self.conn
                .execute(
                    "INSERT INTO _migrations_applied (migration_name, applied_at) VALUES (?, ?)",
                    params![*name, Utc::now().timestamp()],
                )
                .await
                .map_err(|e| CritiqueError::Migration(format!("Failed to record migration: {}", e)))?;

            info!("Executed migration: {}", name);
        }

        info!("Database migrations completed");
        Ok(())
    }

    /// Check the database answers a trivial query
    pub async fn check_database_health(&self) -> Result<()> {
        self.conn
            .query("SELECT 1", params![])
            .await
            .map_err(|e| CritiqueError::Database(format!("Health check failed: {}", e)))?;
        debug!("Database health check passed");
        Ok(())
    }

    fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| CritiqueError::Database(format!("Invalid timestamp: {}", millis)))
    }

    fn row_to_entry(row: &libsql::Row) -> Result<FeedbackEntry> {
        let id: String = row.get(0)?;
        let created_at: i64 = row.get(3)?;

        Ok(FeedbackEntry {
            id: FeedbackId::from_string(&id)?,
            user_input: row.get(1)?,
            feedback: row.get(2)?,
            created_at: Self::millis_to_datetime(created_at)?,
        })
    }
}

#[async_trait]
impl FeedbackStore for LibsqlStorage {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord> {
        let record = FeedbackRecord {
            id: feedback.id.unwrap_or_default(),
            user_id: feedback.user_id,
            user_input: feedback.user_input.into_inner(),
            feedback: feedback.feedback.into_inner(),
            created_at: truncate_to_millis(feedback.created_at.unwrap_or_else(Utc::now)),
        };

        debug!("Storing feedback {} for user {}", record.id, record.user_id);

        self.conn
            .execute(
                "INSERT INTO feedback (id, user_id, user_input, feedback, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    record.id.to_string(),
                    record.user_id.as_str().to_string(),
                    record.user_input.clone(),
                    record.feedback.clone(),
                    record.created_at.timestamp_millis(),
                ],
            )
            .await?;

        Ok(record)
    }

    async fn find_recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<FeedbackEntry>> {
        debug!("Listing feedback (user: {}, limit: {})", user_id, limit);

        let mut rows = self
            .conn
            .query(
                "SELECT id, user_input, feedback, created_at FROM feedback
                 WHERE user_id = ?
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?",
                params![user_id.as_str().to_string(), limit as i64],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(Self::row_to_entry(&row)?);
        }

        debug!("Listed {} feedback records", entries.len());
        Ok(entries)
    }
}
