//! # cov-db
//!
//! libSQL storage for Covboard.
//!
//! Holds the relational state the aggregator reads: phases, companies,
//! modules, TORs, test objectives with their scenarios and company links, and
//! the stakeholder-group → TOR → test-case chain. `CovService` implements
//! `cov_core::provider::DataProvider` on top of it and exposes the phase
//! configuration surface.
//!
//! Uses the `libsql` crate for both local files (and `:memory:` in tests)
//! and remote Turso databases.

pub mod error;
pub mod helpers;
mod migrations;
pub mod provider;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use retry::{RetryConfig, with_retry};

/// Central database handle for all Covboard state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation and
/// retry-aware query helpers used by the repos.
pub struct CovDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
    retry: RetryConfig,
}

impl CovDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::from_database(db, false).await
    }

    /// Open a remote libSQL/Turso database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::from_database(db, true).await
    }

    async fn from_database(db: libsql::Database, remote: bool) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let cov_db = Self {
            db,
            conn,
            remote,
            retry: RetryConfig::default(),
        };
        cov_db.run_migrations().await?;
        tracing::debug!(remote, "covboard database opened");
        Ok(cov_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle talks to a remote database.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Run a read query, retrying transient remote failures.
    ///
    /// `params` is called once per attempt so the parameter list can be
    /// rebuilt for each retry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the query ultimately fails.
    pub async fn query_with<F, P>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P + Send + Sync,
        P: libsql::params::IntoParams,
    {
        if !self.remote {
            return Ok(self.conn.query(sql, params()).await?);
        }
        Ok(with_retry(&self.retry, || self.conn.query(sql, params())).await?)
    }

    /// Run a single `SELECT COUNT(*) ...` style query returning one integer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails, returns no row, or the count
    /// is negative.
    pub async fn query_count(&self, sql: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .query_with(sql, || libsql::params::Params::None)
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count)
            .map_err(|_| DatabaseError::InvalidState(format!("negative count {count} from '{sql}'")))
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"obj-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Helper to create an in-memory database for testing.
    async fn test_db() -> CovDb {
        CovDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "phases",
            "companies",
            "modules",
            "tors",
            "test_objectives",
            "scenarios",
            "objective_companies",
            "stakeholder_groups",
            "group_tors",
            "tor_test_cases",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
        assert!(!db.is_remote());
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("obj").await.unwrap();
        assert!(id.starts_with("obj-"), "ID should start with 'obj-': {id}");
        assert_eq!(
            id.len(),
            12,
            "ID should be 12 chars (3 prefix + 1 dash + 8 hex): {id}"
        );

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in cov_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn query_count_reads_single_integer() {
        let db = test_db().await;
        db.conn()
            .execute("INSERT INTO companies (id, name) VALUES ('cmp-1', 'Acme')", ())
            .await
            .unwrap();
        let count = db.query_count("SELECT COUNT(*) FROM companies").await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn query_with_accepts_iterator_and_positional_params() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO companies (id, name) VALUES ('cmp-1', 'Acme'), ('cmp-2', 'Globex')",
                (),
            )
            .await
            .unwrap();

        let mut rows = db
            .query_with("SELECT name FROM companies WHERE id = ?1", || {
                libsql::params_from_iter(["cmp-2"])
            })
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "Globex");

        let mut rows = db
            .query_with("SELECT COUNT(*) FROM companies WHERE id IN (?1, ?2)", || {
                libsql::params::Params::Positional(vec![
                    libsql::Value::from("cmp-1"),
                    libsql::Value::from("cmp-2"),
                ])
            })
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 2);
    }

    #[tokio::test]
    async fn phase_code_unique_ignoring_case() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO phases (id, code, name) VALUES ('phs-1', 'UAT', 'User acceptance')",
                (),
            )
            .await
            .unwrap();
        let result = db
            .conn()
            .execute(
                "INSERT INTO phases (id, code, name) VALUES ('phs-2', 'uat', 'Duplicate')",
                (),
            )
            .await;
        assert!(result.is_err(), "case-folded duplicate code should be rejected");
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO tors (id, code, module_id) VALUES ('tor-1', 'T1', 'mod-missing')",
                (),
            )
            .await;
        assert!(result.is_err(), "TOR with unknown module should be rejected");
    }
}
