use super::*;
use rlt_core::ID;
use rlt_core::Unique;
use tokio::sync::RwLock;

/// How a [`Memory`] store answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Health {
    #[default]
    Up,
    /// Every call fails with a backend error.
    Down,
    /// Every call hangs forever.
    Stalled,
}

/// In-process store for tests and local runs. Not durable.
#[derive(Debug, Default)]
pub struct Memory {
    members: RwLock<Vec<Member>>,
    sessions: RwLock<Vec<Session>>,
    health: std::sync::atomic::AtomicU8,
    serial: std::sync::atomic::AtomicI64,
}

impl Memory {
    pub fn set_health(&self, health: Health) {
        let code = match health {
            Health::Up => 0,
            Health::Down => 1,
            Health::Stalled => 2,
        };
        self.health.store(code, std::sync::atomic::Ordering::Relaxed);
    }
    async fn check(&self) -> Result<(), StoreError> {
        match self.health.load(std::sync::atomic::Ordering::Relaxed) {
            0 => Ok(()),
            1 => Err(StoreError::Backend("store unreachable".into())),
            _ => std::future::pending().await,
        }
    }
    /// Removes a member, as an account deletion would.
    pub async fn forget(&self, id: ID<Member>) {
        self.members.write().await.retain(|m| m.id() != id);
        self.sessions.write().await.retain(|s| s.user() != id);
    }
    pub async fn sessions(&self) -> Vec<Session> {
        self.sessions.read().await.clone()
    }
}

impl Members for Memory {
    async fn find_by_id(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
        self.check().await?;
        Ok(self.members.read().await.iter().find(|m| m.id() == id).cloned())
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        self.check().await?;
        Ok(self
            .members
            .read()
            .await
            .iter()
            .find(|m| m.email() == email)
            .cloned())
    }
    async fn create(&self, registration: &Registration) -> Result<Member, StoreError> {
        self.check().await?;
        let mut members = self.members.write().await;
        if members.iter().any(|m| m.email() == registration.email) {
            return Err(StoreError::Duplicate);
        }
        let member = Member::new(
            registration.id,
            registration.name.clone(),
            registration.email.clone(),
            registration.hashword.clone(),
            std::time::SystemTime::now(),
        );
        members.push(member.clone());
        Ok(member)
    }
}

impl Sessions for Memory {
    async fn insert(&self, session: Session) -> Result<Session, StoreError> {
        self.check().await?;
        let mut sessions = self.sessions.write().await;
        let stored = Session::stored(
            self.serial.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1,
            session.user(),
            session.hash().to_vec(),
            session.expires_at(),
            std::time::SystemTime::now(),
        );
        sessions.push(stored.clone());
        Ok(stored)
    }
    async fn find_valid_by_digest(
        &self,
        hash: &[u8],
        now: std::time::SystemTime,
    ) -> Result<Option<Session>, StoreError> {
        self.check().await?;
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .find(|s| s.hash() == hash && s.valid_at(now))
            .cloned())
    }
}
