use super::*;
use regex::Regex;
use std::sync::LazyLock;

const MIN_PASSWORD: usize = 8;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@<>()\[\],;:]+@[^\s@<>()\[\],;:]+\.[^\s@<>()\[\],;:.]+$").expect("email regex")
});

/// Collects the first violation per field.
#[derive(Debug, Default)]
pub struct Validator(Violations);

impl Validator {
    pub fn check(mut self, ok: bool, field: &'static str, message: &'static str) -> Self {
        if !ok {
            self.0.entry(field).or_insert(message);
        }
        self
    }
    pub fn finish(self) -> Result<(), AuthError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Invalid(self.0))
        }
    }
}

pub fn email(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        Validator::default()
            .check(!self.name.trim().is_empty(), "name", "cannot be blank")
            .check(!self.email.trim().is_empty(), "email", "cannot be blank")
            .check(
                self.password.trim().chars().count() >= MIN_PASSWORD,
                "password",
                "cannot be less than 8 characters",
            )
            .check(email(&self.email), "email", "provide valid email")
            .finish()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        Validator::default()
            .check(!self.email.trim().is_empty(), "email", "cannot be blank")
            .check(email(&self.email), "email", "provide valid email")
            .check(!self.password.trim().is_empty(), "password", "cannot be blank")
            .finish()
    }
}
