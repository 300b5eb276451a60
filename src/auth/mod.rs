pub mod session;
pub mod verifier;

use crate::auth::session::{Session, SessionStore};
use crate::auth::verifier::{CredentialVerifier, DemoAccount, MockCredentialVerifier, User};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AuthError {
    // same message for unknown email and wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("unknown or expired session")]
    UnknownSession,
}

/// Demo login/logout/session lifecycle. The artificial delay stands in
/// for the network round-trip a real identity provider would cost.
#[derive(Clone)]
pub struct AuthService {
    verifier: Arc<dyn CredentialVerifier>,
    sessions: Arc<SessionStore>,
    network_delay: Duration,
}

impl AuthService {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, network_delay: Duration) -> Self {
        Self {
            verifier,
            sessions: Arc::new(SessionStore::default()),
            network_delay,
        }
    }

    /// Demo verifier with no simulated latency; used by tests and local
    /// tooling.
    pub fn demo() -> Self {
        Self::new(Arc::new(MockCredentialVerifier::default()), Duration::ZERO)
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<(String, Session, User), AuthError> {
        tokio::time::sleep(self.network_delay).await;
        let user = self
            .verifier
            .verify(email, password)
            .ok_or(AuthError::InvalidCredentials)?;
        let (token, session) = self.sessions.create(&user, remember_me);
        info!(email = %user.email, remember_me, "login successful");
        Ok((token, session, user))
    }

    /// Logout is idempotent; logging out an unknown token succeeds.
    pub async fn logout(&self, token: &str) {
        tokio::time::sleep(self.network_delay).await;
        self.sessions.remove(token);
        info!("logout successful");
    }

    pub fn session(&self, token: &str) -> Result<Session, AuthError> {
        self.sessions.get(token).ok_or(AuthError::UnknownSession)
    }

    pub fn refresh(&self, token: &str) -> Result<Session, AuthError> {
        self.sessions.refresh(token).ok_or(AuthError::UnknownSession)
    }

    pub fn demo_accounts(&self) -> Vec<DemoAccount> {
        self.verifier.demo_accounts()
    }

    pub fn sweep(&self) -> usize {
        self.sessions.sweep()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("sessions", &self.sessions.len())
            .field("network_delay", &self.network_delay)
            .finish()
    }
}
