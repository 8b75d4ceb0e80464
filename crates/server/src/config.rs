use rlt_auth::Hasher;
use rlt_auth::Settings;
use std::time::Duration;

/// Deployment environment. Production marks cookies `Secure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

/// Process configuration. Every flag falls back to its environment variable.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "backend", about = "Landlord and tenant records API")]
pub struct Config {
    /// Listen address.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8888")]
    pub bind: String,
    /// PostgreSQL connection URL.
    #[arg(long, env = "DB_URL", hide_env_values = true)]
    pub db_url: String,
    /// Access token signing secret.
    #[arg(long, env = "JWT_ACCESS_SECRET", hide_env_values = true, value_parser = secret)]
    pub jwt_access_secret: String,
    /// Access token lifetime, e.g. `15m`.
    #[arg(long, env = "JWT_ACCESS_EXPIRE", default_value = "15m", value_parser = duration)]
    pub jwt_access_expire: Duration,
    /// Refresh session lifetime, e.g. `30d`.
    #[arg(long, env = "SESSION_EXPIRE", default_value = "30d", value_parser = duration)]
    pub session_expire: Duration,
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,
    /// Single origin allowed to call the API with credentials.
    #[arg(long, env = "TRUSTED_ORIGIN")]
    pub trusted_origin: String,
    /// Upper bound on any single store call.
    #[arg(long, env = "STORE_TIMEOUT", default_value = "5s", value_parser = duration)]
    pub store_timeout: Duration,
    /// Deadline for a client to send request headers.
    #[arg(long, env = "READ_TIMEOUT", default_value = "10s", value_parser = duration)]
    pub read_timeout: Duration,
    /// Deadline for a client to acknowledge connection shutdown.
    #[arg(long, env = "WRITE_TIMEOUT", default_value = "10s", value_parser = duration)]
    pub write_timeout: Duration,
    /// How long an idle keep-alive connection stays open.
    #[arg(long, env = "IDLE_TIMEOUT", default_value = "60s", value_parser = duration)]
    pub idle_timeout: Duration,
    #[arg(long, env = "WORKERS", default_value_t = 6)]
    pub workers: usize,
    /// Argon2 memory cost in KiB.
    #[arg(long, env = "HASH_MEMORY_KIB", default_value_t = 19 * 1024)]
    pub hash_memory: u32,
    /// Argon2 passes over memory.
    #[arg(long, env = "HASH_ITERATIONS", default_value_t = 2)]
    pub hash_iterations: u32,
    /// Argon2 lanes.
    #[arg(long, env = "HASH_PARALLELISM", default_value_t = 1)]
    pub hash_parallelism: u32,
}

fn duration(s: &str) -> Result<Duration, String> {
    rlt_core::parse_duration(s).ok_or_else(|| format!("`{}` is not a duration like 30s, 15m, 2h, 1d", s))
}

fn secret(s: &str) -> Result<String, String> {
    match s.trim().is_empty() {
        true => Err(String::from("signing secret must not be empty")),
        false => Ok(s.to_string()),
    }
}

impl Config {
    pub fn load() -> Self {
        <Self as clap::Parser>::parse()
    }
    pub fn settings(&self) -> Settings {
        Settings {
            access: self.jwt_access_expire,
            session: self.session_expire,
            secure: self.environment == Environment::Production,
            timeout: self.store_timeout,
        }
    }
    pub fn hasher(&self) -> anyhow::Result<Hasher> {
        Hasher::new(self.hash_memory, self.hash_iterations, self.hash_parallelism)
            .map_err(anyhow::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const REQUIRED: [&str; 7] = [
        "backend",
        "--db-url",
        "postgres://localhost/realtor",
        "--jwt-access-secret",
        "s3cret",
        "--trusted-origin",
        "http://localhost:3000",
    ];

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(REQUIRED).unwrap();
        assert_eq!(config.jwt_access_expire, Duration::from_secs(900));
        assert_eq!(config.session_expire, Duration::from_secs(30 * 86400));
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert_eq!(config.write_timeout, Duration::from_secs(10));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.settings().secure);
        assert!(config.hasher().is_ok());
    }

    #[test]
    fn production_cookies_are_secure() {
        let args = REQUIRED.iter().copied().chain(["--environment", "production"]);
        let config = Config::try_parse_from(args).unwrap();
        assert!(config.settings().secure);
    }

    #[test]
    fn connection_timeouts() {
        let args = REQUIRED.iter().copied().chain([
            "--read-timeout",
            "3s",
            "--write-timeout",
            "4s",
            "--idle-timeout",
            "2m",
        ]);
        let config = Config::try_parse_from(args).unwrap();
        assert_eq!(config.read_timeout, Duration::from_secs(3));
        assert_eq!(config.write_timeout, Duration::from_secs(4));
        assert_eq!(config.idle_timeout, Duration::from_secs(120));
    }

    #[test]
    fn rejects_bad_values() {
        let args = REQUIRED.iter().copied().chain(["--session-expire", "forever"]);
        assert!(Config::try_parse_from(args).is_err());
        let args = REQUIRED.iter().copied().chain(["--jwt-access-expire", "5µ"]);
        assert!(Config::try_parse_from(args).is_err());
        let args = REQUIRED.iter().copied().chain(["--session-expire", "300000000000000d"]);
        assert!(Config::try_parse_from(args).is_err());
        let mut blank = REQUIRED;
        blank[4] = "  ";
        assert!(Config::try_parse_from(blank).is_err());
    }
}
