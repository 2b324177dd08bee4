use common::validate::{email_address, not_blank};
use db::models::company::CompanyInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Fields are optional so that blank and missing values get the same message.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub company_info: CompanyInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Signup form after multipart parsing. Text values are already trimmed and
/// blank ones are `None`.
#[derive(Debug, Default, Validate)]
pub struct SignupForm {
    #[validate(
        required(message = "Email is required"),
        custom(function = "email_address", message = "Email should be valid")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Password is required"),
        custom(function = "not_blank", message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: Option<String>,
    #[validate(required(message = "Name is required"))]
    pub name: Option<String>,
    #[validate(required(message = "Company name is required"))]
    pub company_name: Option<String>,
    #[validate(required(message = "Company address is required"))]
    pub company_address: Option<String>,
    #[validate(required(message = "Bank name is required"))]
    pub bank_name: Option<String>,
    #[validate(required(message = "Account number is required"))]
    pub account_number: Option<String>,
    #[validate(required(message = "Account holder name is required"))]
    pub account_holder_name: Option<String>,
    #[validate(required(message = "IFSC code is required"))]
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub branch_code: Option<String>,
    pub company_logo: Option<LogoUpload>,
}

#[derive(Debug)]
pub struct LogoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
