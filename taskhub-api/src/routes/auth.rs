/// Account endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register an unconfirmed account
/// - `POST /v1/auth/login` - Exchange credentials for a session token
/// - `GET  /v1/auth/confirm/:token` - Confirm an account
/// - `POST /v1/auth/forgot-password` - Mail a password-reset link
/// - `GET  /v1/auth/forgot-password/:token` - Check a reset token
/// - `POST /v1/auth/forgot-password/:token` - Set a new password
/// - `GET  /v1/auth/profile` - Current user (authenticated)

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{AppJson, AppPath},
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskhub_shared::{
    auth::middleware::AuthContext,
    mail::MailDelivery,
    models::user::PublicUser,
    services::accounts::{self, Registered, Registration, Session},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (strength is checked by the account service)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password-reset request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address of the account
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// New password request
///
/// Strength is checked by the account service after the token lookup.
#[derive(Debug, Deserialize)]
pub struct NewPasswordRequest {
    /// Replacement password
    pub password: String,
}

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Reset-request acknowledgement with the mail outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub reset_email: MailDelivery,
}

/// Register a new account
///
/// The account stays unconfirmed until the mailed link is followed. A
/// failed confirmation mail does not undo the registration; the response
/// reports `"confirmation_email": "failed"` instead.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// { "name": "Ada", "email": "ada@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: malformed body fields
/// - `400 Bad Request`: email taken or weak password
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Registered>)> {
    validate_request(&req)?;

    let registered = accounts::register(
        state.store.as_ref(),
        state.mailer.as_ref(),
        &state.accounts,
        Registration {
            name: req.name,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(registered)))
}

/// Login with email and password
///
/// # Errors
///
/// - `404 Not Found`: unknown email
/// - `401 Unauthorized`: unconfirmed account or wrong password
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<Session>> {
    validate_request(&req)?;

    let session =
        accounts::authenticate(state.store.as_ref(), &state.accounts, &req.email, &req.password)
            .await?;

    Ok(Json(session))
}

/// Confirm an account from the mailed link
pub async fn confirm(
    State(state): State<AppState>,
    AppPath(token): AppPath<String>,
) -> ApiResult<Json<MessageResponse>> {
    accounts::confirm_account(state.store.as_ref(), &token).await?;

    Ok(Json(MessageResponse {
        message: "account confirmed".to_string(),
    }))
}

/// Issue a password-reset token and mail the link
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(req): AppJson<ForgotPasswordRequest>,
) -> ApiResult<Json<ForgotPasswordResponse>> {
    validate_request(&req)?;

    let requested = accounts::request_password_reset(
        state.store.as_ref(),
        state.mailer.as_ref(),
        &state.accounts,
        &req.email,
    )
    .await?;

    Ok(Json(ForgotPasswordResponse {
        message: "password reset instructions sent".to_string(),
        reset_email: requested.reset_email,
    }))
}

/// Check whether a reset token is still valid
pub async fn check_reset_token(
    State(state): State<AppState>,
    AppPath(token): AppPath<String>,
) -> ApiResult<Json<MessageResponse>> {
    accounts::validate_reset_token(state.store.as_ref(), &token).await?;

    Ok(Json(MessageResponse {
        message: "token is valid".to_string(),
    }))
}

/// Set a new password using a reset token
pub async fn new_password(
    State(state): State<AppState>,
    AppPath(token): AppPath<String>,
    AppJson(req): AppJson<NewPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    accounts::set_new_password(state.store.as_ref(), &token, req.password).await?;

    Ok(Json(MessageResponse {
        message: "password updated".to_string(),
    }))
}

/// Current user's public profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<PublicUser>> {
    let user = accounts::get_profile(state.store.as_ref(), auth.user_id).await?;

    Ok(Json(user))
}
