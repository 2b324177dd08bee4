use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{Responder, get, post, web};
use common::{
    env_config::Config,
    error::Res,
    http::Success,
    multipart::{self, Form},
};
use db::Store;
use serde_json::json;
use storage::FileStorage;

use crate::{
    dtos::auth::{
        AuthResponse, LoginRequest, LogoUpload, SignupForm, ValidateRequest, ValidateResponse,
    },
    services,
};

const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Authenticates a user with email and password.
///
/// # Input
/// - `login_data`: JSON payload containing email and password
/// - `store`: User store
/// - `config`: Application configuration for JWT generation
///
/// # Output
/// - Success: Returns the JWT token with the user id and email
/// - Error: Returns 400 Bad Request for a blank email or password
/// - Error: Returns 401 Unauthorized with "Invalid email or password"
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/login', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ email: 'owner@acme.io', password: 'secret1' })
/// });
///
/// if (response.ok) {
///   const { token, userId, email } = await response.json();
///   localStorage.setItem('authToken', token);
/// }
/// ```
#[post("/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    store: web::Data<Arc<dyn Store>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let user = services::auth::authenticate_user(store.get_ref().as_ref(), &login_data).await?;
    let token = services::auth::issue_token(&user, &config.jwt_config)?;
    log::info!("User {} logged in", user.id);
    Success::ok(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
    })
}

/// Registers a user together with the company profile used on invoices.
///
/// # Input
/// - `payload`: multipart form with `email`, `password`, `name`, `companyName`,
///   `companyAddress`, `bankName`, `accountNumber`, `accountHolderName`, `ifscCode`,
///   optional `branchName`, `branchCode` and a `companyLogo` file
/// - `store`: User and company store
/// - `storage`: File storage for the logo
/// - `config`: Application configuration
///
/// # Output
/// - Success: Returns 201 Created with token, user id, email and the company info
/// - Error: Returns 400 Bad Request listing every invalid field, or "Email already registered"
///
/// # Frontend Example
/// ```javascript
/// const form = new FormData();
/// form.append('email', 'owner@acme.io');
/// form.append('password', 'secret1');
/// form.append('name', 'Owner');
/// form.append('companyName', 'Acme Labs');
/// form.append('companyAddress', '1 Loop');
/// form.append('bankName', 'State Bank');
/// form.append('accountNumber', '123456');
/// form.append('accountHolderName', 'Acme Labs');
/// form.append('ifscCode', 'SBIN0001');
/// form.append('companyLogo', logoInput.files[0]);
///
/// const response = await fetch('/api/auth/signup', { method: 'POST', body: form });
/// const { token, companyInfo } = await response.json();
/// ```
#[post("/signup")]
pub async fn post_signup(
    payload: Multipart,
    store: web::Data<Arc<dyn Store>>,
    storage: web::Data<Arc<FileStorage>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let form = multipart::read_form(payload, MAX_LOGO_BYTES).await?;
    let response = services::user::signup(
        store.get_ref().as_ref(),
        storage.get_ref(),
        signup_form(form),
        &config,
    )
    .await?;
    Success::created(response)
}

fn signup_form(mut form: Form) -> SignupForm {
    SignupForm {
        email: form.text("email"),
        password: form
            .fields
            .get("password")
            .filter(|password| !password.is_empty())
            .cloned(),
        name: form.text("name"),
        company_name: form.text("companyName"),
        company_address: form.text("companyAddress"),
        bank_name: form.text("bankName"),
        account_number: form.text("accountNumber"),
        account_holder_name: form.text("accountHolderName"),
        ifsc_code: form.text("ifscCode"),
        branch_name: form.text("branchName"),
        branch_code: form.text("branchCode"),
        company_logo: form.take_file("companyLogo").map(|file| LogoUpload {
            file_name: file.file_name,
            bytes: file.bytes,
        }),
    }
}

/// Checks whether a token is still valid.
///
/// # Input
/// - `body`: JSON payload `{ "token": "..." }`
///
/// # Output
/// - Success: Always 200 with `{ "valid": true | false }`
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/validate', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ token: localStorage.getItem('authToken') })
/// });
/// const { valid } = await response.json();
/// ```
#[post("/validate")]
pub async fn post_validate(
    body: web::Json<ValidateRequest>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let valid = body
        .token
        .as_deref()
        .is_some_and(|token| services::auth::is_token_valid(token, &config.jwt_config.secret));
    Success::ok(ValidateResponse { valid })
}

#[get("/health")]
pub async fn get_health() -> Res<impl Responder> {
    Success::ok(json!({
        "status": "UP",
        "service": "Auth Service",
        "timestamp": chrono::Utc::now().timestamp_millis(),
    }))
}
