use super::*;
use rlt_core::ID;

/// Access assertion payload. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<Member>, ttl: std::time::Duration) -> Self {
        Self::at(user, std::time::SystemTime::now(), ttl)
    }
    /// Claims minted at an explicit instant.
    pub fn at(user: ID<Member>, now: std::time::SystemTime, ttl: std::time::Duration) -> Self {
        let now = rlt_core::epoch(now);
        Self {
            sub: user.inner(),
            iat: now,
            nbf: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
    pub fn user(&self) -> ID<Member> {
        ID::from(self.sub)
    }
}
