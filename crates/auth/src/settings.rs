use std::time::Duration;

/// Name of the cookie carrying the refresh secret.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Immutable authentication settings, built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Access token lifetime.
    pub access: Duration,
    /// Refresh session lifetime.
    pub session: Duration,
    /// Mark the refresh cookie `Secure`.
    pub secure: bool,
    /// Upper bound on any single store call.
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access: Duration::from_secs(15 * 60),
            session: Duration::from_secs(30 * 86400),
            secure: false,
            timeout: Duration::from_secs(5),
        }
    }
}
