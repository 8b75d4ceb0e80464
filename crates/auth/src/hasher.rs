use super::*;
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::SaltString;

fn salt() -> Result<SaltString, AuthError> {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Argon2id password hashing with a configurable work factor.
#[derive(Debug, Clone)]
pub struct Hasher {
    params: argon2::Params,
    pub(crate) decoy: std::sync::OnceLock<Vec<u8>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            params: argon2::Params::default(),
            decoy: std::sync::OnceLock::new(),
        }
    }
}

impl Hasher {
    /// Memory in KiB, passes over memory, and lanes.
    pub fn new(memory: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        argon2::Params::new(memory, iterations, parallelism, None)
            .map(|params| Self {
                params,
                decoy: std::sync::OnceLock::new(),
            })
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
    fn argon(&self) -> Argon2<'_> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        )
    }
    /// PHC-formatted hash. Parameters and salt travel inside it.
    pub fn hash(&self, password: &str) -> Result<Vec<u8>, AuthError> {
        self.argon()
            .hash_password(password.as_bytes(), &salt()?)
            .map(|h| h.to_string().into_bytes())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
    /// `Mismatch` when the password is wrong; `Hashing` when the stored hash is unusable.
    pub fn verify(&self, password: &str, hashword: &[u8]) -> Result<(), AuthError> {
        let hashword =
            std::str::from_utf8(hashword).map_err(|e| AuthError::Hashing(e.to_string()))?;
        let hash = PasswordHash::new(hashword).map_err(|e| AuthError::Hashing(e.to_string()))?;
        match self.argon().verify_password(password.as_bytes(), &hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(AuthError::Mismatch),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}

impl Hasher {
    /// Spends one full verification on a throwaway hash with the same
    /// parameters, so a missing account costs as much as a wrong password.
    pub fn decoy(&self, password: &str) {
        let hashword = match self.decoy.get() {
            Some(hashword) => hashword,
            None => match self.hash("decoy") {
                Ok(hashword) => self.decoy.get_or_init(|| hashword),
                Err(e) => {
                    log::error!("decoy hash unavailable: {}", e);
                    return;
                }
            },
        };
        let _ = self.verify(password, hashword);
    }
}

/// Cheap unsalted digest for high-entropy secrets. Lookup key, not a password hash.
pub fn digest(secret: &str) -> Vec<u8> {
    use sha2::Digest;
    sha2::Sha256::digest(secret.as_bytes()).to_vec()
}
