//! SQLite-backed cache store.
//!
//! One database file per device, schema bootstrapped on connect. The pool
//! is capped at a single connection so cache writes serialize: an `upsert`
//! is never observable half-applied by a concurrent `find`.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::auth::Account;
use crate::cache::{CacheError, CacheStore};

const CREATE_ACCOUNTS_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        employee_id TEXT NOT NULL,
        credential_digest TEXT NOT NULL,
        is_synced INTEGER NOT NULL,
        is_premium INTEGER NOT NULL,
        role TEXT
    )
";

const CREATE_PERMISSIONS_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS account_permissions (
        account_id TEXT NOT NULL,
        permission TEXT NOT NULL,
        PRIMARY KEY (account_id, permission)
    )
";

pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    /// Connect and bootstrap the schema.
    ///
    /// Use a `mode=rwc` DSN (for example `sqlite://ensaluti.db?mode=rwc`)
    /// to create the database file on first run, or `sqlite::memory:` for
    /// an ephemeral store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub async fn connect(dsn: &str) -> Result<Self, CacheError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(dsn)
            .await?;

        sqlx::query(CREATE_ACCOUNTS_SQL).execute(&pool).await?;
        sqlx::query(CREATE_PERMISSIONS_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }
}

fn account_from_row(row: &SqliteRow) -> Result<Account, CacheError> {
    let raw_id: String = row.get("id");
    let id = Uuid::parse_str(&raw_id)
        .map_err(|err| CacheError::Corrupt(format!("account id {raw_id}: {err}")))?;

    Ok(Account {
        id,
        username: row.get("username"),
        employee_id: row.get("employee_id"),
        credential_digest: row.get("credential_digest"),
        is_synced: row.get("is_synced"),
        is_premium: row.get("is_premium"),
        role: row.get("role"),
    })
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn find(&self, username: &str) -> Result<Option<Account>, CacheError> {
        let query = "SELECT id, username, employee_id, credential_digest, is_synced, is_premium, role FROM accounts WHERE username = ?1";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CacheError> {
        let query = "SELECT id, username, employee_id, credential_digest, is_synced, is_premium, role FROM accounts WHERE id = ?1";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn upsert(&self, account: &Account) -> Result<(), CacheError> {
        // Single statement keyed by id: incoming fields win, permission rows
        // for the id are untouched.
        let query = r"
            INSERT INTO accounts
                (id, username, employee_id, credential_digest, is_synced, is_premium, role)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                employee_id = excluded.employee_id,
                credential_digest = excluded.credential_digest,
                is_synced = excluded.is_synced,
                is_premium = excluded.is_premium,
                role = excluded.role
        ";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.username)
            .bind(&account.employee_id)
            .bind(&account.credential_digest)
            .bind(account.is_synced)
            .bind(account.is_premium)
            .bind(account.role.as_deref())
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }

    async fn permissions(&self, id: Uuid) -> Result<HashSet<String>, CacheError> {
        let query = "SELECT permission FROM account_permissions WHERE account_id = ?1";
        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("permission"))
            .collect())
    }

    async fn set_permissions(
        &self,
        id: Uuid,
        permissions: &HashSet<String>,
    ) -> Result<(), CacheError> {
        // Transaction keeps the replacement atomic: readers see the old set
        // or the new set, never a partial mix.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM account_permissions WHERE account_id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        for permission in permissions {
            sqlx::query(
                "INSERT INTO account_permissions (account_id, permission) VALUES (?1, ?2)",
            )
            .bind(id.to_string())
            .bind(permission)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM account_permissions")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM accounts").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
