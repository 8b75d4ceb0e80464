use super::*;
use rlt_core::ID;

/// Identity lookup owned by user management.
#[allow(async_fn_in_trait)]
pub trait Members {
    async fn find_by_id(&self, id: ID<Member>) -> Result<Option<Member>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError>;
    /// Duplicate e-mail surfaces as [`StoreError::Duplicate`].
    async fn create(&self, registration: &Registration) -> Result<Member, StoreError>;
}

/// Refresh session persistence. Concurrency is the store's business.
#[allow(async_fn_in_trait)]
pub trait Sessions {
    /// Persists the session and returns it with its assigned id.
    async fn insert(&self, session: Session) -> Result<Session, StoreError>;
    /// Session whose digest matches and whose expiry is after `now`.
    async fn find_valid_by_digest(
        &self,
        hash: &[u8],
        now: std::time::SystemTime,
    ) -> Result<Option<Session>, StoreError>;
}

/// Runs a store call under a deadline. No retries.
pub async fn bounded<T>(
    limit: std::time::Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, AuthError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(AuthError::from),
        Err(_) => Err(AuthError::Timeout(limit)),
    }
}

#[cfg(feature = "database")]
mod postgres {
    use super::*;
    use rlt_pg::*;
    use std::sync::Arc;
    use tokio_postgres::Client;

    const MEMBER_COLUMNS: &str = "id, name, email, hashword, created_at";

    fn member(row: &tokio_postgres::Row) -> Member {
        Member::new(
            ID::from(row.get::<_, uuid::Uuid>(0)),
            row.get::<_, String>(1),
            row.get::<_, String>(2),
            row.get::<_, Vec<u8>>(3),
            row.get::<_, std::time::SystemTime>(4),
        )
    }

    impl Members for Arc<Client> {
        async fn find_by_id(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
            self.query_opt(
                const_format::concatcp!("SELECT ", MEMBER_COLUMNS, " FROM ", USERS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map(|opt| opt.as_ref().map(member))
            .map_err(StoreError::from)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
            self.query_opt(
                const_format::concatcp!("SELECT ", MEMBER_COLUMNS, " FROM ", USERS, " WHERE email = $1"),
                &[&email],
            )
            .await
            .map(|opt| opt.as_ref().map(member))
            .map_err(StoreError::from)
        }

        async fn create(&self, registration: &Registration) -> Result<Member, StoreError> {
            self.query_one(
                const_format::concatcp!(
                    "INSERT INTO ",
                    USERS,
                    " (id, name, email, hashword) VALUES ($1, $2, $3, $4) RETURNING ",
                    MEMBER_COLUMNS
                ),
                &[
                    &registration.id.inner(),
                    &registration.name,
                    &registration.email,
                    &registration.hashword,
                ],
            )
            .await
            .map(|row| member(&row))
            .map_err(StoreError::from)
        }
    }

    impl Sessions for Arc<Client> {
        async fn insert(&self, session: Session) -> Result<Session, StoreError> {
            self.query_one(
                const_format::concatcp!(
                    "INSERT INTO ",
                    SESSIONS,
                    " (hash, user_id, valid_till) VALUES ($1, $2, $3) RETURNING id, created_at"
                ),
                &[&session.hash(), &session.user().inner(), &session.expires_at()],
            )
            .await
            .map(|row| {
                Session::stored(
                    row.get::<_, i64>(0),
                    session.user(),
                    session.hash().to_vec(),
                    session.expires_at(),
                    row.get::<_, std::time::SystemTime>(1),
                )
            })
            .map_err(StoreError::from)
        }

        async fn find_valid_by_digest(
            &self,
            hash: &[u8],
            now: std::time::SystemTime,
        ) -> Result<Option<Session>, StoreError> {
            self.query_opt(
                const_format::concatcp!(
                    "SELECT id, user_id, hash, valid_till, created_at FROM ",
                    SESSIONS,
                    " WHERE hash = $1 AND valid_till > $2 LIMIT 1"
                ),
                &[&hash, &now],
            )
            .await
            .map(|opt| {
                opt.map(|row| {
                    Session::stored(
                        row.get::<_, i64>(0),
                        ID::from(row.get::<_, uuid::Uuid>(1)),
                        row.get::<_, Vec<u8>>(2),
                        row.get::<_, std::time::SystemTime>(3),
                        row.get::<_, std::time::SystemTime>(4),
                    )
                })
            })
            .map_err(StoreError::from)
        }
    }
}
