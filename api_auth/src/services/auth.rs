use actix_web::web;
use common::{
    env_config::JwtConfig,
    error::{AppError, Res},
    jwt::{self, ClaimsSpec},
    validate,
};
use db::{Store, models::user::User};

use crate::dtos::auth::LoginRequest;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Hashes on the blocking pool, bcrypt is deliberately slow.
pub async fn hash_password(password: String, cost: u32) -> Res<String> {
    web::block(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing was cancelled: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, password_hash: String) -> Res<bool> {
    let verified = web::block(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password check was cancelled: {}", e)))?;
    Ok(verified.unwrap_or_else(|e| {
        log::warn!("Stored password hash could not be checked: {}", e);
        false
    }))
}

/// Checks email and password against the stored credentials.
///
/// # Arguments
///
/// * `store` - The user store.
/// * `login_data` - Raw login body; the email is normalized here.
///
/// # Returns
///
/// The user, or `Unauthorized` with the same message whether the email is unknown
/// or the password is wrong.
pub async fn authenticate_user(store: &dyn Store, login_data: &LoginRequest) -> Res<User> {
    let email = login_data
        .email
        .as_deref()
        .map(validate::normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;
    let password = login_data
        .password
        .clone()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;

    let Some((user, credentials)) = store.get_user_with_password_hash(&email).await? else {
        log::info!("Login attempt for unknown email {}", email);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if verify_password(password, credentials.password_hash).await? {
        Ok(user)
    } else {
        log::info!("Wrong password for user {}", user.id);
        Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

pub fn issue_token(user: &User, config: &JwtConfig) -> Res<String> {
    jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            email: user.email.clone(),
        },
        config,
    )
}

pub fn is_token_valid(token: &str, secret: &str) -> bool {
    jwt::validate_jwt(token.trim(), secret).is_ok()
}
