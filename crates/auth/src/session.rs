use super::*;
use rlt_core::ID;

/// Bytes of randomness behind every refresh secret.
const SECRET_BYTES: usize = 32;

/// Persisted refresh session. Holds the digest of the secret, never the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: i64,
    user: ID<Member>,
    hash: Vec<u8>,
    expires: std::time::SystemTime,
    created: std::time::SystemTime,
}

impl Session {
    /// Unsaved session. The store assigns `id` and `created`.
    pub fn new(user: ID<Member>, hash: Vec<u8>, expires: std::time::SystemTime) -> Self {
        Self {
            id: 0,
            user,
            hash,
            expires,
            created: std::time::SystemTime::now(),
        }
    }
    /// Session as read back from a store.
    pub fn stored(
        id: i64,
        user: ID<Member>,
        hash: Vec<u8>,
        expires: std::time::SystemTime,
        created: std::time::SystemTime,
    ) -> Self {
        Self {
            id,
            user,
            hash,
            expires,
            created,
        }
    }
    pub fn id(&self) -> i64 {
        self.id
    }
    pub fn user(&self) -> ID<Member> {
        self.user
    }
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
    pub fn expires_at(&self) -> std::time::SystemTime {
        self.expires
    }
    pub fn created_at(&self) -> std::time::SystemTime {
        self.created
    }
    pub fn valid_at(&self, now: std::time::SystemTime) -> bool {
        now < self.expires
    }
}

/// Raw refresh secret. Exists only on its way back to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn generate() -> Self {
        use base64::Engine;
        use rand::Rng;
        let ref mut bytes = [0u8; SECRET_BYTES];
        rand::rng().fill(bytes);
        Self(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }
    pub fn digest(&self) -> Vec<u8> {
        hasher::digest(&self.0)
    }
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use rlt_pg::*;

    impl Schema for Session {
        fn name() -> &'static str {
            SESSIONS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SESSIONS,
                " (
                    id          BIGSERIAL PRIMARY KEY,
                    hash        BYTEA NOT NULL,
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    valid_till  TIMESTAMPTZ NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sessions_user ON ",
                SESSIONS,
                " (user_id);
                 CREATE INDEX IF NOT EXISTS idx_sessions_hash ON ",
                SESSIONS,
                " (hash);"
            )
        }
    }
}
