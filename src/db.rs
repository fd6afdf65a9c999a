use crate::config::Config;
use anyhow::Result;
use libsql::params::IntoParams;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

pub struct Database {
    db: LibsqlDatabase,
    conn: Connection,
    tx_lock: Mutex<()>,
    turso_url: Option<String>,
    turso_auth_token: Option<String>,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn is_replica(turso_url: &Option<String>, turso_auth_token: &Option<String>) -> bool {
        turso_url.is_some() && turso_auth_token.is_some()
    }

    pub async fn sync(&self) -> Result<()> {
        if Self::is_replica(&self.turso_url, &self.turso_auth_token) {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(cfg.app.get_db());
        let turso_url = cfg.app.turso_url.clone();
        let turso_auth_token = cfg.app.turso_auth_token.clone();

        let db = match (&turso_url, &turso_auth_token) {
            (Some(url), Some(token)) => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                Builder::new_synced_database(&path, url.clone(), token.clone())
                    .sync_interval(sync_interval)
                    .build()
                    .await?
            }
            _ => Builder::new_local(&path).build().await?,
        };

        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        let module_migrations = SYSTEM_MIGRATIONS
            .iter()
            .chain(crate::links::migrations())
            .chain(crate::settings::migrations())
            .chain(crate::shortener::migrations());

        for (filename, sql) in module_migrations {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database {
            db,
            conn,
            tx_lock: Mutex::new(()),
            turso_url,
            turso_auth_token,
        })
    }

    /// A single write outside any transaction. Takes the transaction lock so
    /// it cannot land inside another caller's open BEGIN and be rolled back
    /// with it.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64> {
        let _guard = self.tx_lock.lock().await;
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Runs `f` between BEGIN and COMMIT, rolling back if it fails.
    /// Must not be nested: the lock is not reentrant.
    pub async fn transaction<'a, T, F, Fut>(&'a self, f: F) -> Result<T>
    where
        F: FnOnce(&'a Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _guard = self.tx_lock.lock().await;

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        match f(&self.conn).await {
            Ok(value) => {
                self.conn.execute("COMMIT", ()).await?;
                Ok(value)
            }
            Err(e) => {
                let _ = self.conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }
}

/// `?, ?, ?` for an `IN (...)` list of `n` values.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
