use anyhow::Result;
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlxPostgresConnector};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub type DbPool = PgPool;
pub type OrmConn = DatabaseConnection;

/// Seat uniqueness constraint on `tickets (performance_id, row, seat)`.
pub const TICKET_SEAT_CONSTRAINT: &str = "tickets_performance_row_seat_key";
pub const HALL_NAME_CONSTRAINT: &str = "theatre_halls_name_key";
pub const USER_EMAIL_CONSTRAINT: &str = "users_email_key";

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Wrap an existing pool so sqlx and SeaORM share the same connections.
pub fn orm_from_pool(pool: &DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone())
}

/// Applies the SQL files in `migrations/` that have not run yet.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Name of the unique constraint a failed statement tripped over, if any.
pub fn unique_violation(err: &DbErr) -> Option<&str> {
    let sqlx_err = match err {
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => e,
        _ => return None,
    };
    let db_err = sqlx_err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    db_err.constraint()
}
