use super::*;
use rlt_core::ID;

/// Freshly issued credentials. The secret is the only copy in existence.
#[derive(Debug)]
pub struct Pair {
    pub access: String,
    pub refresh: Secret,
    pub expires: std::time::SystemTime,
}

/// Issues access tokens and refresh sessions.
///
/// Owns the codec and the immutable settings; the session store is passed
/// per call so one manager serves any backend.
pub struct Manager {
    crypto: Crypto,
    settings: Settings,
}

impl Manager {
    pub fn new(secret: &[u8], settings: Settings) -> Self {
        Self {
            crypto: Crypto::new(secret),
            settings,
        }
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    /// Access token with the configured lifetime. No I/O.
    pub fn access(&self, user: ID<Member>) -> Result<String, AuthError> {
        self.crypto.issue(user, self.settings.access)
    }
    /// Subject of a valid access token.
    pub fn verify(&self, token: &str) -> Result<ID<Member>, AuthError> {
        self.crypto.verify(token)
    }
    /// Access token plus a new refresh session. Only the digest is stored.
    pub async fn pair<S: Sessions>(&self, store: &S, user: ID<Member>) -> Result<Pair, AuthError> {
        let access = self.access(user)?;
        let refresh = Secret::generate();
        let expires = std::time::SystemTime::now() + self.settings.session;
        let session = Session::new(user, refresh.digest(), expires);
        let session = bounded(self.settings.timeout, store.insert(session)).await?;
        log::debug!("opened session {} for {}", session.id(), user);
        Ok(Pair {
            access,
            refresh,
            expires,
        })
    }
    /// New access token for the session behind `secret`.
    /// The session is neither rotated nor extended.
    pub async fn refresh<S: Sessions>(&self, store: &S, secret: &str) -> Result<String, AuthError> {
        let ref hash = hasher::digest(secret);
        let now = std::time::SystemTime::now();
        let session = bounded(self.settings.timeout, store.find_valid_by_digest(hash, now))
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        self.access(session.user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use std::time::SystemTime;

    fn manager() -> Manager {
        Manager::new(b"manager secret", Settings::default())
    }

    #[tokio::test]
    async fn pair_then_refresh() {
        let ref store = Memory::default();
        let manager = manager();
        let user = ID::<Member>::default();
        let pair = manager.pair(store, user).await.unwrap();
        assert_eq!(manager.verify(&pair.access).unwrap(), user);
        let access = manager.refresh(store, pair.refresh.expose()).await.unwrap();
        assert_eq!(manager.verify(&access).unwrap(), user);
    }

    #[tokio::test]
    async fn stores_digest_not_secret() {
        let ref store = Memory::default();
        let manager = manager();
        let user = ID::<Member>::default();
        let a = manager.pair(store, user).await.unwrap();
        let b = manager.pair(store, user).await.unwrap();
        assert_ne!(a.refresh, b.refresh);
        let sessions = store.sessions().await;
        assert_eq!(sessions.len(), 2);
        assert_ne!(sessions[0].hash(), sessions[1].hash());
        assert_eq!(sessions[0].hash(), a.refresh.digest().as_slice());
        for session in sessions.iter() {
            assert_ne!(session.hash(), a.refresh.expose().as_bytes());
            assert_ne!(session.hash(), b.refresh.expose().as_bytes());
        }
    }

    #[tokio::test]
    async fn session_expiry_follows_settings() {
        let ref store = Memory::default();
        let manager = manager();
        let before = SystemTime::now();
        let pair = manager.pair(store, ID::default()).await.unwrap();
        let stored = store.sessions().await.remove(0);
        assert_eq!(stored.expires_at(), pair.expires);
        assert!(pair.expires >= before + manager.settings().session);
    }

    #[tokio::test]
    async fn unknown_and_expired_look_alike() {
        let ref store = Memory::default();
        let manager = manager();
        let expired = Secret::generate();
        store
            .insert(Session::new(
                ID::default(),
                expired.digest(),
                SystemTime::now() - Duration::from_secs(1),
            ))
            .await
            .unwrap();
        let unknown = manager.refresh(store, "never issued").await.unwrap_err();
        let stale = manager.refresh(store, expired.expose()).await.unwrap_err();
        assert!(matches!(unknown, AuthError::SessionNotFound));
        assert!(matches!(stale, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn refresh_does_not_rotate() {
        let ref store = Memory::default();
        let manager = manager();
        let pair = manager.pair(store, ID::default()).await.unwrap();
        for _ in 0..3 {
            manager.refresh(store, pair.refresh.expose()).await.unwrap();
        }
        assert_eq!(store.sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_system_fault() {
        let ref store = Memory::default();
        store.set_health(Health::Down);
        let err = manager().pair(store, ID::default()).await.unwrap_err();
        assert_eq!(err.kind(), Fault::System);
        let err = manager().refresh(store, "whatever").await.unwrap_err();
        assert_eq!(err.kind(), Fault::System);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_store_times_out() {
        let ref store = Memory::default();
        store.set_health(Health::Stalled);
        let err = manager().refresh(store, "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::Timeout(_)));
    }
}
