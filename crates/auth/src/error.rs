use std::collections::BTreeMap;

/// Coarse classification of every failure the subsystem can produce.
/// Decides the status family at the boundary and how loudly we log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Malformed header or body. Never retried.
    Validation,
    /// Bad credential of any sort. Always a uniform 401.
    Auth,
    /// Request conflicts with existing state (duplicate e-mail).
    Conflict,
    /// Store, signing, hashing, or wiring failure. Always a 5xx.
    System,
}

/// Failures reported by a store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "database")]
impl From<rlt_pg::PgErr> for StoreError {
    fn from(e: rlt_pg::PgErr) -> Self {
        if rlt_pg::duplicate(&e) {
            Self::Duplicate
        } else {
            Self::Backend(Box::new(e))
        }
    }
}

/// Field name to first violation message.
pub type Violations = BTreeMap<&'static str, &'static str>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header is not `<scheme> <token>`")]
    Malformed,
    #[error("authorization scheme is not bearer")]
    Scheme,
    #[error("request body rejected: {0}")]
    Body(String),
    #[error("request body failed validation")]
    Invalid(Violations),

    #[error("invalid token")]
    InvalidToken,
    #[error("session not found")]
    SessionNotFound,
    #[error("identity not found")]
    IdentityNotFound,
    #[error("password mismatch")]
    Mismatch,
    #[error("anonymous request")]
    Anonymous,

    #[error("email already in use")]
    Conflict,

    #[error("store: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("store call exceeded {0:?}")]
    Timeout(std::time::Duration),
    #[error("token signing: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("password hashing: {0}")]
    Hashing(String),
    #[error("{0} is not configured")]
    Unconfigured(&'static str),
}

impl AuthError {
    pub fn kind(&self) -> Fault {
        match self {
            Self::Malformed | Self::Scheme | Self::Body(_) | Self::Invalid(_) => Fault::Validation,
            Self::InvalidToken
            | Self::SessionNotFound
            | Self::IdentityNotFound
            | Self::Mismatch
            | Self::Anonymous => Fault::Auth,
            Self::Conflict => Fault::Conflict,
            Self::Store(_)
            | Self::Timeout(_)
            | Self::Signing(_)
            | Self::Hashing(_)
            | Self::Unconfigured(_) => Fault::System,
        }
    }
    /// Whether the 401 should name the expected scheme.
    /// Only scheme- and format-related rejections do.
    pub fn challenges(&self) -> bool {
        matches!(self, Self::Malformed | Self::Scheme | Self::InvalidToken)
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => Self::Conflict,
            StoreError::Backend(e) => Self::Store(e),
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::*;
    use actix_web::HttpResponse;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use actix_web::http::header;

    impl ResponseError for AuthError {
        fn status_code(&self) -> StatusCode {
            match (self.kind(), self) {
                (Fault::Validation, Self::Malformed | Self::Scheme) => StatusCode::UNAUTHORIZED,
                (Fault::Validation, _) => StatusCode::UNPROCESSABLE_ENTITY,
                (Fault::Auth, _) => StatusCode::UNAUTHORIZED,
                (Fault::Conflict, _) => StatusCode::CONFLICT,
                (Fault::System, _) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
        fn error_response(&self) -> HttpResponse {
            let mut response = HttpResponse::build(self.status_code());
            if self.challenges() {
                response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
            }
            match self {
                Self::Invalid(violations) => response.json(violations),
                Self::Body(detail) => response.json(serde_json::json!({ "error": detail })),
                Self::Conflict => response.json(serde_json::json!({ "error": self.to_string() })),
                e if e.kind() == Fault::System => {
                    log::error!("server error: {}", e);
                    response.json(serde_json::json!({ "error": "internal server error" }))
                }
                e => {
                    log::debug!("unauthorized: {}", e);
                    response.json(serde_json::json!({ "error": "unauthorized" }))
                }
            }
        }
    }
}
