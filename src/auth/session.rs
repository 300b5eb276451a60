use crate::auth::verifier::{Role, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use time::{Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

pub const REGULAR_SESSION: Duration = Duration::hours(24);
pub const REMEMBER_ME_SESSION: Duration = Duration::days(7);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub remember_me: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Session {
    pub fn for_user(user: &User, remember_me: bool, now: OffsetDateTime) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
            expires_at: now + Self::duration(remember_me),
            remember_me,
            created_at: now,
        }
    }

    pub fn duration(remember_me: bool) -> Duration {
        if remember_me {
            REMEMBER_ME_SESSION
        } else {
            REGULAR_SESSION
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }

    pub fn refreshed_at(&self, now: OffsetDateTime) -> Self {
        Self {
            expires_at: now + Self::duration(self.remember_me),
            ..self.clone()
        }
    }
}

/// Token-keyed session map. Expiry is checked against wall-clock time on
/// every read; an expired session is removed before it is ever handed out.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn create(&self, user: &User, remember_me: bool) -> (String, Session) {
        self.create_at(user, remember_me, OffsetDateTime::now_utc())
    }

    pub fn create_at(
        &self,
        user: &User,
        remember_me: bool,
        now: OffsetDateTime,
    ) -> (String, Session) {
        let token = Uuid::new_v4().to_string();
        let session = Session::for_user(user, remember_me, now);
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(token.clone(), session.clone());
        (token, session)
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        self.get_at(token, OffsetDateTime::now_utc())
    }

    pub fn get_at(&self, token: &str, now: OffsetDateTime) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions.get(token)?.clone();
        if session.is_expired_at(now) {
            info!(email = %session.email, "session expired, clearing");
            sessions.remove(token);
            return None;
        }
        Some(session)
    }

    pub fn refresh(&self, token: &str) -> Option<Session> {
        self.refresh_at(token, OffsetDateTime::now_utc())
    }

    pub fn refresh_at(&self, token: &str, now: OffsetDateTime) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions.get(token)?.clone();
        if session.is_expired_at(now) {
            sessions.remove(token);
            return None;
        }
        let refreshed = session.refreshed_at(now);
        sessions.insert(token.to_string(), refreshed.clone());
        Some(refreshed)
    }

    /// Removal is idempotent; an unknown token is not an error.
    pub fn remove(&self, token: &str) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(token);
    }

    /// Drops expired sessions and extends the rest, mirroring the
    /// periodic re-validation an authenticated client would run.
    /// Returns the number of sessions force-removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(OffsetDateTime::now_utc())
    }

    pub fn sweep_at(&self, now: OffsetDateTime) -> usize {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        let removed = before - sessions.len();
        for session in sessions.values_mut() {
            *session = session.refreshed_at(now);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
