use super::*;

/// Request identity context: exactly one of anonymous or a resolved member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum User {
    Anon(Lurker),
    Auth(Member),
}

impl User {
    /// Authorization guard: anonymous requests stop here.
    pub fn member(&self) -> Result<&Member, AuthError> {
        match self {
            Self::Auth(m) => Ok(m),
            Self::Anon(_) => Err(AuthError::Anonymous),
        }
    }
}

impl From<Lurker> for User {
    fn from(lurker: Lurker) -> Self {
        Self::Anon(lurker)
    }
}

impl From<Member> for User {
    fn from(member: Member) -> Self {
        Self::Auth(member)
    }
}
