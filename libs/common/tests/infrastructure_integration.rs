//! Integration tests for the database plumbing
//!
//! These tests need a reachable PostgreSQL instance named by `DATABASE_URL`.

use common::database::{DatabaseConfig, health_check, init_pool};
use common::error::DatabaseError;
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a PostgreSQL instance at DATABASE_URL"]
async fn test_database_connectivity() -> anyhow::Result<()> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance at DATABASE_URL"]
async fn test_unique_violation_is_classified() -> anyhow::Result<()> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    // temporary tables are per connection
    let mut conn = pool.acquire().await?;

    sqlx::query("CREATE TEMPORARY TABLE uniq_probe (email TEXT UNIQUE)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO uniq_probe (email) VALUES ('dup@x.com')")
        .execute(&mut *conn)
        .await?;

    let err = sqlx::query("INSERT INTO uniq_probe (email) VALUES ('dup@x.com')")
        .execute(&mut *conn)
        .await
        .map_err(DatabaseError::from)
        .unwrap_err();

    assert!(matches!(err, DatabaseError::UniqueViolation { .. }));
    Ok(())
}
