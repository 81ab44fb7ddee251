use std::str::FromStr;
use std::time::Duration;

use amplify_core::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_config(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&config.url, config.max_connections, config.timeout_secs).await
}

/// Opens a pool, creating the database file on first use.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(normalize_url(database_url))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await
}

fn normalize_url(database_url: &str) -> &str {
    match database_url.trim() {
        ":memory:" => "sqlite::memory:",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use amplify_core::config::DatabaseConfig;
    use sqlx::Row;

    use super::{connect_with_config, normalize_url};

    #[test]
    fn bare_memory_url_is_normalized() {
        assert_eq!(normalize_url(":memory:"), "sqlite::memory:");
        assert_eq!(normalize_url("sqlite://amplify.db"), "sqlite://amplify.db");
    }

    #[tokio::test]
    async fn file_database_is_created_on_first_connect() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("amplify.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 1,
            timeout_secs: 5,
        };

        let pool = connect_with_config(&config).await.expect("connect");
        let value: i64 = sqlx::query("SELECT 1 AS value")
            .fetch_one(&pool)
            .await
            .expect("select")
            .get("value");

        assert_eq!(value, 1);
        assert!(path.exists());
    }
}
