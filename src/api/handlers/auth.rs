use crate::{
    auth::messages,
    types::{
        AppError, ConfirmOtpRequest, GoogleSignInRequest, LoginRequest, PasswordResetRequest,
        RegisterRequest, Result, Role, SendOtpRequest, TokenResponse,
    },
    AppState,
};
use axum::{extract::State, Json};
use tracing::{info, warn};
use uuid::Uuid;

/// Password reset tokens stay valid for one hour.
const RESET_TOKEN_TTL: i64 = 3600;

/// Store the hash of a freshly minted refresh token. The session row is
/// what makes the token redeemable; its expiry follows the refresh
/// lifetime, not the access lifetime.
async fn store_refresh_session(state: &AppState, user_id: &str, tokens: &TokenResponse) -> Result<()> {
    let token_hash = state.auth_service.hash_token(&tokens.refresh_token);
    let session_id = Uuid::new_v4().to_string();
    state
        .directory
        .create_session(
            &session_id,
            user_id,
            &token_hash,
            chrono::Utc::now().timestamp() + state.auth_service.refresh_expiry(),
        )
        .await
}

/// Remember the email for pre-filling this account's next login form.
/// Preference writes are non-critical and never fail the request.
fn remember_email(state: &AppState, user_id: &str, email: &str) {
    if let Err(e) = state
        .prefs
        .update(user_id, |prefs| prefs.last_email = Some(email.to_string()))
    {
        warn!("Failed to persist last login email: {}", e);
    }
}

/// Register a new user with email and password
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = TokenResponse),
        (status = 400, description = "Invalid input or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    if !payload.email.contains('@') {
        return Err(AppError::InvalidInput(messages::human_message(
            "auth/invalid-email",
        )));
    }
    if payload.password.len() < 8 {
        return Err(AppError::InvalidInput(messages::human_message(
            "auth/weak-password",
        )));
    }

    if state
        .directory
        .get_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::InvalidInput(messages::human_message(
            "auth/email-already-in-use",
        )));
    }

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::Student);

    let user_id = Uuid::new_v4().to_string();
    state
        .directory
        .create_user(
            &user_id,
            &payload.email,
            Some(&password_hash),
            &payload.name,
            role,
        )
        .await?;

    let tokens = state
        .auth_service
        .generate_tokens(&user_id, &payload.email, role)?;
    store_refresh_session(&state, &user_id, &tokens).await?;
    remember_email(&state, &user_id, &payload.email);

    info!(email = %payload.email, role = role.as_str(), "user registered");
    Ok(Json(tokens))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Unknown email or wrong password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .directory
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Auth(messages::human_message("auth/user-not-found")))?;

    // Accounts provisioned through Google sign-in have no password.
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Auth(messages::human_message("auth/wrong-password")))?;

    if !state
        .auth_service
        .verify_password(&payload.password, password_hash)?
    {
        return Err(AppError::Auth(messages::human_message(
            "auth/wrong-password",
        )));
    }

    let tokens = state
        .auth_service
        .generate_tokens(&user.id, &user.email, user.role)?;
    store_refresh_session(&state, &user.id, &tokens).await?;
    remember_email(&state, &user.id, &user.email);

    Ok(Json(tokens))
}

/// Refresh access token, rotating the refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Fresh token pair", body = TokenResponse),
        (status = 401, description = "Unknown, expired, or already-rotated refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<TokenResponse>> {
    let refresh_token = payload
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::InvalidInput("Refresh token required".to_string()))?;

    let claims = state.auth_service.verify_token(refresh_token)?;

    // Only tokens with a live session row are redeemable. An access token
    // carries a valid signature too, but its hash was never stored.
    let token_hash = state.auth_service.hash_token(refresh_token);
    let session = state
        .directory
        .get_session_by_token_hash(&token_hash)
        .await?
        .ok_or_else(|| AppError::Auth(messages::human_message("auth/invalid-credential")))?;

    // Rotation: the presented token is spent whether or not it is still
    // within its window.
    state.directory.delete_session(&session.id).await?;

    if session.expires_at <= chrono::Utc::now().timestamp() {
        return Err(AppError::Auth(messages::human_message(
            "auth/invalid-credential",
        )));
    }

    let tokens = state
        .auth_service
        .generate_tokens(&claims.sub, &claims.email, claims.role)?;
    store_refresh_session(&state, &session.user_id, &tokens).await?;

    Ok(Json(tokens))
}

/// Sign in with a Google ID token
#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleSignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Token rejected by the provider")
    ),
    tag = "auth"
)]
pub async fn google_sign_in(
    State(state): State<AppState>,
    Json(payload): Json<GoogleSignInRequest>,
) -> Result<Json<TokenResponse>> {
    let verifier = state
        .google_verifier
        .clone()
        .ok_or_else(|| AppError::Internal("Google sign-in is not configured".to_string()))?;

    let identity = verifier.verify(&payload.id_token).await?;

    // Prefer the Google account link; fall back to matching the verified
    // email so an existing password account gets linked instead of
    // duplicated.
    let user = match state.directory.get_user_by_google_sub(&identity.sub).await? {
        Some(user) => user,
        None => match state.directory.get_user_by_email(&identity.email).await? {
            Some(user) => {
                state.directory.link_google(&user.id, &identity.sub).await?;
                info!(email = %identity.email, "linked Google account to existing user");
                user
            }
            None => {
                let user_id = Uuid::new_v4().to_string();
                let name = identity
                    .name
                    .clone()
                    .unwrap_or_else(|| identity.email.split('@').next().unwrap_or("").to_string());
                state
                    .directory
                    .create_user(&user_id, &identity.email, None, &name, Role::Student)
                    .await?;
                state.directory.link_google(&user_id, &identity.sub).await?;
                info!(email = %identity.email, "provisioned user from Google sign-in");
                state
                    .directory
                    .get_user_by_id(&user_id)
                    .await?
                    .ok_or_else(|| AppError::Internal("User vanished after create".to_string()))?
            }
        },
    };

    let tokens = state
        .auth_service
        .generate_tokens(&user.id, &user.email, user.role)?;
    store_refresh_session(&state, &user.id, &tokens).await?;
    remember_email(&state, &user.id, &user.email);

    Ok(Json(tokens))
}

/// Start phone verification for an existing account
pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>> {
    if state
        .directory
        .get_user_by_email(&payload.email)
        .await?
        .is_none()
    {
        return Err(AppError::Auth(messages::human_message(
            "auth/user-not-found",
        )));
    }

    // Delivery belongs to the external SMS channel; we only mint the code.
    let _code = state
        .otp_service
        .start_verification(&payload.email, &payload.phone);

    Ok(Json(serde_json::json!({ "status": "code-sent" })))
}

/// Confirm a phone verification code and link the phone number
#[utoipa::path(
    post,
    path = "/api/auth/otp/confirm",
    request_body = ConfirmOtpRequest,
    responses(
        (status = 200, description = "Phone verified and linked", body = TokenResponse),
        (status = 401, description = "Wrong or expired code")
    ),
    tag = "auth"
)]
pub async fn confirm_otp(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmOtpRequest>,
) -> Result<Json<TokenResponse>> {
    state
        .otp_service
        .confirm(&payload.email, &payload.phone, &payload.code)?;

    let user = state
        .directory
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Auth(messages::human_message("auth/user-not-found")))?;

    state.directory.link_phone(&user.id, &payload.phone).await?;
    info!(email = %user.email, "phone credential linked");

    let tokens = state
        .auth_service
        .generate_tokens(&user.id, &user.email, user.role)?;
    store_refresh_session(&state, &user.id, &tokens).await?;

    Ok(Json(tokens))
}

/// Request a password reset token
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .directory
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Auth(messages::human_message("auth/user-not-found")))?;

    // The token itself goes out through the external mail channel; only
    // its hash is stored.
    let reset_token = Uuid::new_v4().to_string();
    let token_hash = state.auth_service.hash_token(&reset_token);
    state
        .directory
        .create_password_reset(
            &Uuid::new_v4().to_string(),
            &user.id,
            &token_hash,
            chrono::Utc::now().timestamp() + RESET_TOKEN_TTL,
        )
        .await?;

    info!(email = %user.email, "password reset token issued");
    Ok(Json(serde_json::json!({ "status": "reset-requested" })))
}
