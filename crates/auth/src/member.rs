use rlt_core::ID;
use rlt_core::Unique;

/// Registered user. Owned by user management; authentication only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: ID<Self>,
    name: String,
    email: String,
    hashword: Vec<u8>,
    created: std::time::SystemTime,
}

impl Member {
    pub fn new(
        id: ID<Self>,
        name: String,
        email: String,
        hashword: Vec<u8>,
        created: std::time::SystemTime,
    ) -> Self {
        Self {
            id,
            name,
            email,
            hashword,
            created,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn hashword(&self) -> &[u8] {
        &self.hashword
    }
    pub fn created_at(&self) -> std::time::SystemTime {
        self.created
    }
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Insert parameters for a new member. The store assigns creation time.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: ID<Member>,
    pub name: String,
    pub email: String,
    pub hashword: Vec<u8>,
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use rlt_pg::*;

    impl Schema for Member {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          UUID PRIMARY KEY,
                    name        VARCHAR(255) NOT NULL,
                    email       VARCHAR(255) UNIQUE NOT NULL,
                    hashword    BYTEA NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_email ON ",
                USERS,
                " (email);"
            )
        }
    }
}
