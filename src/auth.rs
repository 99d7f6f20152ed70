//! Credential verification and per-user session context

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::AuthError;

/// Anything that can check a username/password pair
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Fixed username → password table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// The demo accounts used when no credentials are configured
    pub fn demo() -> Self {
        let users = [("admin", "admin123"), ("user", "user456")]
            .into_iter()
            .map(|(u, p)| (u.to_string(), p.to_string()))
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

/// Login state of one client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check credentials and, on success, mark the session as logged in.
    /// A failed attempt leaves the session logged out.
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if verifier.verify(username, password) {
            info!(user = username, "login");
            self.username = Some(username.to_string());
            Ok(())
        } else {
            warn!(user = username, "rejected login");
            self.username = None;
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.username.take() {
            info!(user = %user, "logout");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The logged-in user, or `NotAuthenticated`
    pub fn require(&self) -> Result<&str, AuthError> {
        self.username().ok_or(AuthError::NotAuthenticated)
    }
}
