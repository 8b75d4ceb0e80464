//! PostgreSQL integration.
//!
//! Connectivity and table metadata shared by every crate that persists
//! something. Query code lives next to the domain types it serves.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from a URL
//! - [`migrate()`] — Applies a [`Schema`]'s DDL idempotently
//!
//! ## Table Names
//!
//! Constants for all persistent entities: users and sessions.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
/// The connection future is driven by a spawned task for the client's lifetime.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(Arc::new(client))
}

/// Creates a table and its indices if they do not exist yet.
pub async fn migrate<T: Schema>(client: &Client) -> Result<(), PgErr> {
    log::debug!("ensuring table {}", T::name());
    client.batch_execute(T::creates()).await?;
    client.batch_execute(T::indices()).await?;
    Ok(())
}

/// True when the error is a unique constraint violation (SQLSTATE 23505).
pub fn duplicate(e: &PgErr) -> bool {
    e.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION)
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for refresh sessions.
#[rustfmt::skip]
pub const SESSIONS: &str = "sessions";
/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:    &str = "users";
