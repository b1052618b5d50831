use std::io::Write;

use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::credentials::{self, CredentialError};
use crate::db::{session_repo, user_repo};
use crate::models::User;

const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub user: User,
}

/// Create a regular (non-admin) account with a zero balance.
pub async fn register(
    pool: &PgPool,
    username: &str,
    email: Option<&str>,
    password: &str,
) -> Result<User, AuthError> {
    let username = username.trim();
    let email = email.map(str::trim).filter(|e| !e.is_empty());

    if username.is_empty() {
        return Err(AuthError::Validation("username is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must have at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let hash = credentials::hash_password_blocking(password.to_owned()).await?;
    match user_repo::create_user(pool, username, email, &hash, false).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "User registered");
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AuthError::Validation(
            "username or email already registered".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Check credentials (username or email) and open a new session.
pub async fn login(
    pool: &PgPool,
    config: &AppConfig,
    login: &str,
    password: &str,
) -> Result<LoginSession, AuthError> {
    let found = user_repo::find_by_login(pool, login.trim()).await?;
    let verified = match &found {
        Some(user) => {
            credentials::verify_password_blocking(password.to_owned(), user.password_hash.clone())
                .await?
        }
        None => false,
    };
    let user = match found {
        Some(user) if verified => user,
        _ => {
            tracing::warn!(login = %login, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }
    };

    session_repo::purge_expired(pool, user.id).await?;

    let token = credentials::new_session_token();
    let expires_at = Utc::now() + Duration::hours(config.session_ttl_hours);
    session_repo::insert_session(pool, &credentials::token_digest(&token), user.id, expires_at)
        .await?;

    tracing::info!(user_id = %user.id, admin = user.is_admin, "User logged in");
    Ok(LoginSession {
        token,
        expires_at,
        user,
    })
}

pub async fn logout(pool: &PgPool, token: &str) -> Result<(), AuthError> {
    session_repo::delete_session(pool, &credentials::token_digest(token)).await?;
    Ok(())
}

/// Resolve a bearer token into the caller's context.
pub async fn authenticate(pool: &PgPool, token: &str) -> Result<RequestContext, AuthError> {
    session_repo::find_session_user(pool, &credentials::token_digest(token))
        .await?
        .map(|user| RequestContext::from_user(&user))
        .ok_or(AuthError::InvalidCredentials)
}

pub async fn current_user(pool: &PgPool, ctx: &RequestContext) -> Result<User, AuthError> {
    user_repo::get_user(pool, ctx.user_id)
        .await?
        .ok_or(AuthError::InvalidCredentials)
}

/// Seed the first admin account when none exists.
pub async fn bootstrap_admin(pool: &PgPool, config: &AppConfig) -> anyhow::Result<Option<Uuid>> {
    if user_repo::admin_exists(pool).await? {
        return Ok(None);
    }

    let password = match &config.admin_password {
        Some(p) => p.clone(),
        None => {
            let generated = credentials::new_session_token();
            tracing::warn!(
                username = %config.admin_username,
                "ADMIN_PASSWORD not set; generated admin password printed to stderr"
            );
            announce_admin_password(&mut std::io::stderr(), &config.admin_username, &generated)?;
            generated
        }
    };

    let hash = credentials::hash_password_blocking(password).await?;
    let admin = user_repo::create_user(pool, &config.admin_username, None, &hash, true).await?;

    tracing::info!(user_id = %admin.id, username = %admin.username, "Admin account created");
    Ok(Some(admin.id))
}

/// The only place a generated admin password is ever written.
fn announce_admin_password(
    out: &mut impl Write,
    username: &str,
    password: &str,
) -> std::io::Result<()> {
    writeln!(out, "Generated password for admin '{username}': {password}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_admin_password_goes_to_the_given_writer() {
        let mut out = Vec::new();
        announce_admin_password(&mut out, "admin", "s3cr3t-token").unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Generated password for admin 'admin': s3cr3t-token\n");
    }
}
