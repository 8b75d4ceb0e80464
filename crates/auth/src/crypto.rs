use super::*;
use rlt_core::ID;

/// Pinned signing algorithm. Tokens declaring anything else are rejected.
const ALGORITHM: jsonwebtoken::Algorithm = jsonwebtoken::Algorithm::HS256;

/// Access token codec: HS256 JWTs keyed by a process-wide secret.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = jsonwebtoken::Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
        }
    }
    pub fn issue(&self, user: ID<Member>, ttl: std::time::Duration) -> Result<String, AuthError> {
        self.encode(&Claims::new(user, ttl))
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&jsonwebtoken::Header::new(ALGORITHM), claims, &self.encoding)
            .map_err(AuthError::Signing)
    }
    /// Every failure collapses into `InvalidToken`; the reason is only logged.
    pub fn verify(&self, token: &str) -> Result<ID<Member>, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.user())
            .inspect_err(|e| log::debug!("rejected access token: {:?}", e.kind()))
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use std::time::SystemTime;

    const SECRET: &[u8] = b"the quick brown fox";

    #[test]
    fn roundtrip() {
        let crypto = Crypto::new(SECRET);
        let user = ID::<Member>::default();
        let token = crypto.issue(user, Duration::from_secs(900)).unwrap();
        assert_eq!(crypto.verify(&token).unwrap(), user);
    }

    #[test]
    fn expired() {
        let crypto = Crypto::new(SECRET);
        let past = SystemTime::now() - Duration::from_secs(3600);
        let claims = Claims::at(ID::default(), past, Duration::from_secs(900));
        let token = crypto.encode(&claims).unwrap();
        assert!(matches!(crypto.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn not_yet_valid() {
        let crypto = Crypto::new(SECRET);
        let future = SystemTime::now() + Duration::from_secs(3600);
        let claims = Claims::at(ID::default(), future, Duration::from_secs(900));
        let token = crypto.encode(&claims).unwrap();
        assert!(matches!(crypto.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn foreign_secret() {
        let token = Crypto::new(b"someone else")
            .issue(ID::default(), Duration::from_secs(900))
            .unwrap();
        assert!(matches!(
            Crypto::new(SECRET).verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn substituted_algorithm() {
        let claims = Claims::new(ID::default(), Duration::from_secs(900));
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS512),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            Crypto::new(SECRET).verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn unsigned() {
        let crypto = Crypto::new(SECRET);
        let token = crypto.issue(ID::default(), Duration::from_secs(900)).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        // {"alg":"none","typ":"JWT"}
        let forged = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert!(matches!(crypto.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn tampered_payload() {
        let crypto = Crypto::new(SECRET);
        let token = crypto.issue(ID::default(), Duration::from_secs(900)).unwrap();
        let other = crypto.issue(ID::default(), Duration::from_secs(900)).unwrap();
        let parts = token.split('.').collect::<Vec<_>>();
        let swapped = other.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", parts[0], swapped, parts[2]);
        assert!(matches!(crypto.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage() {
        let crypto = Crypto::new(SECRET);
        for token in ["", "garbage", "a.b.c", "...."] {
            assert!(matches!(crypto.verify(token), Err(AuthError::InvalidToken)));
        }
    }
}
