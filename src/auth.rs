//! Admin sign-in and the session gate in front of the dashboard.
//!
//! Sessions live in the [`Authenticator`], which Rocket manages for the
//! lifetime of the process. A signed-in browser carries an opaque token in
//! an encrypted private cookie; the [`AdminSession`] guard resolves that
//! token against the registry on every admin request.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rocket::http::{CookieJar, Status};
use rocket::request::{self, FromRequest, Outcome, Request};
use rocket::tokio::sync::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::error::{AuthError, ConfigError};

pub const SESSION_COOKIE: &str = "admin_session";
const TOKEN_LEN: usize = 32;

/// Matches the lifetime Rocket gives private cookies.
pub fn session_ttl() -> Duration {
    Duration::weeks(1)
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub email: String,
    pub signed_in_at: NaiveDateTime,
}

pub struct Authenticator {
    admin_email: String,
    password_digest: Vec<u8>,
    sessions: RwLock<HashMap<String, AdminSession>>,
}

impl Authenticator {
    pub fn from_config(config: &AdminConfig) -> Result<Self, ConfigError> {
        let password_digest = if config.password_sha256.is_empty() {
            warn!("admin.password_sha256 is empty, admin sign-in is disabled");
            Vec::new()
        } else {
            let digest =
                hex::decode(config.password_sha256.trim()).map_err(|_| ConfigError::PasswordDigest)?;
            if digest.len() != 32 {
                return Err(ConfigError::PasswordDigest);
            }
            digest
        };

        Ok(Self {
            admin_email: config.email.trim().to_ascii_lowercase(),
            password_digest,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Checks the credentials and opens a session, returning its token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let digest = Sha256::digest(password.as_bytes());

        if self.password_digest.is_empty()
            || email != self.admin_email
            || digest.as_slice() != self.password_digest.as_slice()
        {
            warn!(%email, "rejected admin sign-in");
            return Err(AuthError::InvalidCredentials);
        }

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();

        let session = AdminSession {
            email: email.clone(),
            signed_in_at: Utc::now().naive_utc(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        info!(%email, "admin signed in");

        Ok(token)
    }

    /// The live session behind `token`. Expired sessions are evicted.
    pub async fn current(&self, token: &str) -> Option<AdminSession> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if Utc::now().naive_utc() - session.signed_in_at < session_ttl() {
            return Some(session);
        }

        self.sessions.write().await.remove(token);
        info!(email = %session.email, "admin session expired");
        None
    }

    pub async fn sign_out(&self, token: &str) -> Result<AdminSession, AuthError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(token)
            .ok_or(AuthError::NoSession)?;
        info!(email = %session.email, "admin signed out");
        Ok(session)
    }
}

pub fn session_token(cookies: &CookieJar<'_>) -> Option<String> {
    cookies
        .get_private(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(auth) = req.rocket().state::<Authenticator>() else {
            return Outcome::Error((Status::InternalServerError, AuthError::NoSession));
        };

        let Some(token) = session_token(req.cookies()) else {
            return Outcome::Forward(Status::Unauthorized);
        };

        match auth.current(&token).await {
            Some(session) => Outcome::Success(session),
            None => Outcome::Forward(Status::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(password: &str) -> Authenticator {
        Authenticator::from_config(&AdminConfig {
            email: "Admin@Example.com".into(),
            password_sha256: hex::encode(Sha256::digest(password.as_bytes())),
        })
        .unwrap()
    }

    #[rocket::async_test]
    async fn session_lifecycle() {
        let auth = authenticator("hunter2");

        let token = auth.sign_in("admin@example.com", "hunter2").await.unwrap();
        assert_eq!(auth.current(&token).await.unwrap().email, "admin@example.com");

        auth.sign_out(&token).await.unwrap();
        assert!(auth.current(&token).await.is_none());
        assert_eq!(auth.sign_out(&token).await.unwrap_err(), AuthError::NoSession);
    }

    #[rocket::async_test]
    async fn stale_sessions_are_evicted() {
        let auth = authenticator("hunter2");
        let token = auth.sign_in("admin@example.com", "hunter2").await.unwrap();

        if let Some(session) = auth.sessions.write().await.get_mut(&token) {
            session.signed_in_at -= session_ttl() + Duration::minutes(1);
        }

        assert!(auth.current(&token).await.is_none());
        assert!(auth.sessions.read().await.is_empty());
    }

    #[rocket::async_test]
    async fn bad_credentials_are_rejected() {
        let auth = authenticator("hunter2");

        assert_eq!(
            auth.sign_in("admin@example.com", "hunter3").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.sign_in("someone@example.com", "hunter2").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[rocket::async_test]
    async fn empty_digest_disables_sign_in() {
        let auth = Authenticator::from_config(&AdminConfig {
            email: "admin@example.com".into(),
            password_sha256: String::new(),
        })
        .unwrap();

        assert!(auth.sign_in("admin@example.com", "").await.is_err());
    }

    #[test]
    fn malformed_digest_is_a_config_error() {
        let result = Authenticator::from_config(&AdminConfig {
            email: "admin@example.com".into(),
            password_sha256: "not-hex".into(),
        });
        assert!(matches!(result, Err(ConfigError::PasswordDigest)));
    }
}
