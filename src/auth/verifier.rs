use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use time::macros::datetime;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Seam for swapping in a real identity provider without touching the
/// calling code. The demo implementation below is not a security
/// boundary.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> Option<User>;

    fn demo_accounts(&self) -> Vec<DemoAccount> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
struct MockAccount {
    user: User,
    password: &'static str,
}

#[derive(Debug)]
pub struct MockCredentialVerifier {
    accounts: Vec<MockAccount>,
}

impl Default for MockCredentialVerifier {
    fn default() -> Self {
        Self {
            accounts: vec![
                MockAccount {
                    user: User {
                        id: "demo-user-001".to_string(),
                        email: "demo@shopmonitor.com".to_string(),
                        name: "Demo User".to_string(),
                        role: Role::User,
                        avatar: Some("https://avatars.githubusercontent.com/u/1?v=4".to_string()),
                        created_at: datetime!(2024-01-01 00:00:00 UTC),
                    },
                    password: "demo123",
                },
                MockAccount {
                    user: User {
                        id: "admin-user-001".to_string(),
                        email: "admin@shopmonitor.com".to_string(),
                        name: "Admin User".to_string(),
                        role: Role::Admin,
                        avatar: Some("https://avatars.githubusercontent.com/u/2?v=4".to_string()),
                        created_at: datetime!(2023-12-01 00:00:00 UTC),
                    },
                    password: "admin123",
                },
                MockAccount {
                    user: User {
                        id: "test-user-001".to_string(),
                        email: "test@shopmonitor.com".to_string(),
                        name: "Test User".to_string(),
                        role: Role::User,
                        avatar: None,
                        created_at: datetime!(2024-06-15 00:00:00 UTC),
                    },
                    password: "test123",
                },
            ],
        }
    }
}

impl CredentialVerifier for MockCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> Option<User> {
        let normalized = email.trim().to_lowercase();
        let account = self.accounts.iter().find(|a| a.user.email == normalized)?;
        if account.password != password {
            return None;
        }
        Some(account.user.clone())
    }

    fn demo_accounts(&self) -> Vec<DemoAccount> {
        self.accounts
            .iter()
            .map(|account| DemoAccount {
                email: account.user.email.clone(),
                password: account.password.to_string(),
                name: account.user.name.clone(),
                role: account.user.role,
            })
            .collect()
    }
}
