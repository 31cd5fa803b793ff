use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::AdminConfig;
use crate::core::error::{AppError, Result};

pub const INVALID_CREDENTIALS: &str = "Username atau password salah";

/// Session attached to a request that passed the admin middleware
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
}

/// Static-credential gate for the admin panel.
///
/// A successful login issues an opaque session token kept in memory until
/// logout, expiry or restart. Expired tokens are swept on every login.
pub struct AdminGate {
    username: String,
    password: String,
    session_ttl: Duration,
    /// Token to issued-at
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl AdminGate {
    pub fn new(config: &AdminConfig) -> Self {
        let ttl_secs = config.session_ttl_secs.min(i64::MAX as u64 / 1000) as i64;
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            session_ttl: Duration::seconds(ttl_secs),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn is_live(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - issued_at < self.session_ttl
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        if username.trim() != self.username || password != self.password {
            warn!("Rejected admin login for '{}'", username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let now = Utc::now();
        let token = Uuid::now_v7().to_string();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, issued_at| self.is_live(*issued_at, now));
        if sessions.len() < before {
            debug!("Swept {} expired admin session(s)", before - sessions.len());
        }
        sessions.insert(token.clone(), now);
        drop(sessions);

        info!("Admin '{}' logged in", username.trim());
        Ok(token)
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(token)
            .is_some_and(|issued_at| self.is_live(*issued_at, Utc::now()))
    }

    /// Revoke a session; returns whether it existed
    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_with_ttl(session_ttl_secs: u64) -> AdminGate {
        AdminGate::new(&AdminConfig {
            username: "admin".to_string(),
            password: "rahasia".to_string(),
            session_ttl_secs,
        })
    }

    fn gate() -> AdminGate {
        gate_with_ttl(3600)
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let gate = gate();
        let token = gate.login("admin", "rahasia").await.unwrap();
        assert!(gate.is_valid(&token).await);

        assert!(gate.logout(&token).await);
        assert!(!gate.is_valid(&token).await);
        assert!(!gate.logout(&token).await);
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let gate = gate();
        let err = gate.login("admin", "salah").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == INVALID_CREDENTIALS));
        assert!(gate.login("root", "rahasia").await.is_err());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_rejected_and_swept() {
        let gate = gate_with_ttl(0);

        let first = gate.login("admin", "rahasia").await.unwrap();
        assert!(!gate.is_valid(&first).await);

        let second = gate.login("admin", "rahasia").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(gate.session_count().await, 1);
        assert!(!gate.logout(&first).await);
    }

    #[tokio::test]
    async fn test_live_sessions_survive_sweep() {
        let gate = gate();
        let first = gate.login("admin", "rahasia").await.unwrap();
        let second = gate.login("admin", "rahasia").await.unwrap();

        assert_eq!(gate.session_count().await, 2);
        assert!(gate.is_valid(&first).await);
        assert!(gate.is_valid(&second).await);
    }
}
