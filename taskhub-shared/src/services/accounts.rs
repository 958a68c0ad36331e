//! Account lifecycle: registration, confirmation, login, password recovery.
//!
//! A user is created unconfirmed with a one-time token mailed as a link.
//! Opening the link confirms the account and burns the token. Password
//! recovery issues a fresh token that is burned when the new password is
//! set. Only SHA-256 digests of tokens are stored.

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::auth::{
    jwt::issue_token,
    password::{hash_password_async, validate_password_strength, verify_password_async},
    token::{generate_token, hash_token, is_well_formed},
};
use crate::mail::{
    deliver,
    templates::{confirmation_email, password_reset_email},
    MailDelivery, Mailer,
};
use crate::models::user::{NewUser, PublicUser, User};
use crate::store::{Store, StoreError};

const USER_EXISTS: &str = "user already exists";
const INVALID_TOKEN: &str = "invalid token";

/// Settings the account flows need from configuration
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Base URL for links in outgoing mail
    pub frontend_url: String,

    /// HS256 signing secret for session tokens
    pub jwt_secret: String,

    /// Session token lifetime
    pub session_ttl: Duration,
}

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Result of a registration
#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    pub user: PublicUser,
    pub confirmation_email: MailDelivery,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

/// Result of a password-reset request
#[derive(Debug, Clone, Serialize)]
pub struct ResetRequested {
    pub reset_email: MailDelivery,
}

/// Registers an unconfirmed account and mails the confirmation link
///
/// # Errors
///
/// - `Validation("user already exists")` for a taken email
/// - `Validation` for an empty name or email, or a weak password
pub async fn register(
    store: &dyn Store,
    mailer: &dyn Mailer,
    settings: &AccountSettings,
    input: Registration,
) -> ServiceResult<Registered> {
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();

    if name.is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    if email.is_empty() {
        return Err(ServiceError::Validation("email is required".to_string()));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ServiceError::Validation(USER_EXISTS.to_string()));
    }

    validate_password_strength(&input.password).map_err(ServiceError::Validation)?;

    let token = generate_token();
    let password_hash = hash_password_async(input.password).await?;

    let user = store
        .insert_user(NewUser {
            name,
            email,
            password_hash,
            token_hash: Some(hash_token(&token)),
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            StoreError::Conflict(_) => ServiceError::Validation(USER_EXISTS.to_string()),
            other => other.into(),
        })?;

    info!(user_id = %user.id, "User registered");

    let delivery = deliver(
        mailer,
        &confirmation_email(&settings.frontend_url, &user, &token),
    )
    .await;

    Ok(Registered {
        user: user.to_public(),
        confirmation_email: delivery,
    })
}

/// Verifies credentials and issues a session token
///
/// # Errors
///
/// - `NotFound("user does not exist")` for an unknown email
/// - `Unauthenticated("account not confirmed")` before confirmation
/// - `Unauthenticated("incorrect password")` for a wrong password
pub async fn authenticate(
    store: &dyn Store,
    settings: &AccountSettings,
    email: &str,
    password: &str,
) -> ServiceResult<Session> {
    let user = store
        .find_user_by_email(email.trim())
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    if !user.confirmed {
        return Err(ServiceError::Unauthenticated(
            "account not confirmed".to_string(),
        ));
    }

    if !verify_password_async(password.to_string(), user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "Failed login attempt");
        return Err(ServiceError::Unauthenticated(
            "incorrect password".to_string(),
        ));
    }

    let token = issue_token(user.id, &settings.jwt_secret, settings.session_ttl)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Session {
        user: user.to_public(),
        token,
    })
}

/// Confirms the account holding `token` and burns the token
///
/// # Errors
///
/// `Unauthenticated("invalid token")` when no account holds the token
pub async fn confirm_account(store: &dyn Store, token: &str) -> ServiceResult<PublicUser> {
    let mut user = user_for_token(store, token).await?;

    user.confirmed = true;
    user.token_hash = None;
    let user = store.save_user(&user).await?;

    info!(user_id = %user.id, "Account confirmed");
    Ok(user.to_public())
}

/// Issues a password-reset token and mails the link
///
/// # Errors
///
/// `NotFound("user does not exist")` for an unknown email
pub async fn request_password_reset(
    store: &dyn Store,
    mailer: &dyn Mailer,
    settings: &AccountSettings,
    email: &str,
) -> ServiceResult<ResetRequested> {
    let mut user = store
        .find_user_by_email(email.trim())
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    let token = generate_token();
    user.token_hash = Some(hash_token(&token));
    let user = store.save_user(&user).await?;

    info!(user_id = %user.id, "Password reset requested");

    let delivery = deliver(
        mailer,
        &password_reset_email(&settings.frontend_url, &user, &token),
    )
    .await;

    Ok(ResetRequested {
        reset_email: delivery,
    })
}

/// Checks that a reset token is still pending
///
/// # Errors
///
/// `Unauthenticated("invalid token")` when no account holds the token
pub async fn validate_reset_token(store: &dyn Store, token: &str) -> ServiceResult<()> {
    user_for_token(store, token).await.map(|_| ())
}

/// Sets a new password for the account holding `token` and burns the token
///
/// Completing a reset also confirms the account, since the link proves
/// ownership of the mailbox.
///
/// # Errors
///
/// - `Unauthenticated("invalid token")` when no account holds the token
/// - `Validation` for a weak password
pub async fn set_new_password(store: &dyn Store, token: &str, password: String) -> ServiceResult<()> {
    let mut user = user_for_token(store, token).await?;

    validate_password_strength(&password).map_err(ServiceError::Validation)?;

    user.password_hash = hash_password_async(password).await?;
    user.token_hash = None;
    user.confirmed = true;
    store.save_user(&user).await?;

    info!(user_id = %user.id, "Password updated");
    Ok(())
}

/// Public profile of the authenticated actor
pub async fn get_profile(store: &dyn Store, actor: Uuid) -> ServiceResult<PublicUser> {
    store
        .find_user_by_id(actor)
        .await?
        .map(|u| u.to_public())
        .ok_or_else(|| ServiceError::not_found("user"))
}

async fn user_for_token(store: &dyn Store, token: &str) -> ServiceResult<User> {
    if !is_well_formed(token) {
        return Err(ServiceError::Unauthenticated(INVALID_TOKEN.to_string()));
    }

    store
        .find_user_by_token(&hash_token(token))
        .await?
        .ok_or_else(|| ServiceError::Unauthenticated(INVALID_TOKEN.to_string()))
}
