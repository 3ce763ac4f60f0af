#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig, DATABASE_URL};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    DatabaseConfig {
        url: DATABASE_URL.clone(),
        min_connections: 1,
        connect_timeout_secs: 3,
        acquire_timeout_secs: 5,
        ..DatabaseConfig::default()
    }
}

/// A migrated connection, or `None` when `SKIP_DB_TESTS` is set or Postgres
/// is unreachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = connect_with_config(&test_config()).await else {
                eprintln!("skipping database tests: cannot connect");
                return false;
            };
            migration::Migrator::up(&db, None).await.is_ok()
        })
        .await;
    if !migrated {
        return None;
    }
    // Return a fresh connection for the current test's runtime
    connect_with_config(&test_config()).await.ok()
}

/// Suffix that keeps unique columns distinct across test runs. Short enough
/// for the narrowest column it lands in (`company.phone`, 32 characters).
pub fn unique_suffix() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(10);
    id
}
