//! Token → session map for the HTTP server

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::auth::{CredentialVerifier, Session};
use crate::error::AuthError;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify credentials and open a new session, returning its token
    pub fn login(
        &self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let mut session = Session::new();
        session.login(verifier, username, password)?;

        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), session);
        Ok(token)
    }

    /// End the session behind `token`; unknown tokens are ignored
    pub fn logout(&self, token: &str) {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
        if let Some(mut session) = removed {
            session.logout();
        }
    }

    /// Username of the logged-in session behind `token`
    pub fn username(&self, token: &str) -> Result<String, AuthError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .ok_or(AuthError::NotAuthenticated)?
            .require()
            .map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
