use super::*;
use rlt_core::Unique;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TokenResponse {
    pub fn bearer(token: String) -> Self {
        Self {
            token,
            kind: String::from("Bearer"),
        }
    }
}

/// Body-flavored login: both credentials in the payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct PairResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: i64,
}

impl From<Pair> for PairResponse {
    fn from(pair: Pair) -> Self {
        Self {
            token: pair.access,
            kind: String::from("Bearer"),
            refresh_token: pair.refresh.expose().to_string(),
            expires_at: rlt_core::epoch(pair.expires),
        }
    }
}

/// Public view of a member. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Unix seconds.
    pub created_at: i64,
}

impl From<&Member> for UserInfo {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id().to_string(),
            name: member.name().to_string(),
            email: member.email().to_string(),
            created_at: rlt_core::epoch(member.created_at()),
        }
    }
}
