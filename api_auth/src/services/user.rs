use common::{
    env_config::Config,
    error::{AppError, Res},
    validate,
};
use db::{
    Store,
    dtos::{company::CompanyCreateRequest, user::UserCreateRequest},
    models::{
        company::{BankDetails, CompanyInfo},
        user::User,
    },
};
use storage::FileStorage;
use validator::Validate;

use crate::{
    dtos::auth::{LogoUpload, SignupForm, SignupResponse},
    services::auth,
};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@invoiceapp.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_NAME: &str = "Admin User";

/// Creates the user, its logo and its company profile, then issues a token.
///
/// # Arguments
///
/// * `store` - The user and company store.
/// * `storage` - Where the logo is written.
/// * `form` - Parsed signup form.
/// * `config` - Application configuration (bcrypt cost, JWT settings).
///
/// # Returns
///
/// The token together with the created company profile, or `BadRequest` listing every
/// invalid field or reporting an already registered email.
pub async fn signup(
    store: &dyn Store,
    storage: &FileStorage,
    form: SignupForm,
    config: &Config,
) -> Res<SignupResponse> {
    form.validate()?;

    let email = validate::normalize_email(form.email.as_deref().unwrap_or_default());
    if store.exists_user_by_email(&email).await? {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let password_hash =
        auth::hash_password(form.password.unwrap_or_default(), config.bcrypt_cost).await?;
    let user = store
        .insert_user_with_credentials(UserCreateRequest {
            email,
            name: form.name.unwrap_or_default(),
            password_hash,
        })
        .await?;

    let request = CompanyCreateRequest {
        user_id: user.id,
        company_name: form.company_name.unwrap_or_default(),
        company_address: form.company_address.unwrap_or_default(),
        company_logo: None,
        bank_details: Some(BankDetails {
            bank_name: form.bank_name.unwrap_or_default(),
            account_number: form.account_number.unwrap_or_default(),
            account_holder_name: form.account_holder_name.unwrap_or_default(),
            ifsc_code: form.ifsc_code.unwrap_or_default(),
            branch_name: form.branch_name,
            branch_code: form.branch_code,
        }),
    };
    let company_info = match attach_company(store, storage, request, form.company_logo).await {
        Ok(info) => info,
        Err(err) => {
            log::warn!("Signup of {} failed, removing the new user: {}", user.email, err);
            if let Err(cleanup) = store.delete_user(user.id).await {
                log::error!("Could not remove user {}: {}", user.id, cleanup);
            }
            return Err(err);
        }
    };

    log::info!(
        "Registered user {} with company info {}",
        user.id,
        company_info.id
    );

    Ok(SignupResponse {
        token: auth::issue_token(&user, &config.jwt_config)?,
        user_id: user.id,
        email: user.email,
        company_info,
    })
}

/// Stores the logo, inserts the company profile and links it to its user.
/// A stored logo is removed again when the profile cannot be saved.
async fn attach_company(
    store: &dyn Store,
    storage: &FileStorage,
    mut request: CompanyCreateRequest,
    logo: Option<LogoUpload>,
) -> Res<CompanyInfo> {
    let user_id = request.user_id;
    if let Some(logo) = logo {
        let ext = storage::extension_of(&logo.file_name);
        request.company_logo = Some(storage.store_logo(&logo.bytes, user_id, &ext).await?);
    }
    let logo_reference = request.company_logo.clone();

    let linked = match store.insert_company_info(request).await {
        Ok(info) => store
            .set_company_info_id(user_id, info.id)
            .await
            .map(|_| info),
        Err(err) => Err(err),
    };
    if let (Err(_), Some(reference)) = (&linked, &logo_reference) {
        storage.delete(reference).await;
    }
    linked
}

/// Creates the default admin account when the store holds no users yet.
/// Returns the created user, or `None` when users already exist.
pub async fn seed_default_user(store: &dyn Store, bcrypt_cost: u32) -> Res<Option<User>> {
    if store.count_users().await? > 0 {
        return Ok(None);
    }

    let password_hash =
        auth::hash_password(DEFAULT_ADMIN_PASSWORD.to_string(), bcrypt_cost).await?;
    let user = store
        .insert_user_with_credentials(UserCreateRequest {
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            name: DEFAULT_ADMIN_NAME.to_string(),
            password_hash,
        })
        .await?;

    log::warn!(
        "Created default user {} with the default password. Change these credentials!",
        DEFAULT_ADMIN_EMAIL
    );
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use db::store::UserStore;

    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            email: Some("Owner@Acme.io".to_string()),
            password: Some("secret1".to_string()),
            name: Some("Owner".to_string()),
            company_name: Some("Acme".to_string()),
            company_address: Some("1 Loop".to_string()),
            bank_name: Some("State Bank".to_string()),
            account_number: Some("123".to_string()),
            account_holder_name: Some("Acme".to_string()),
            ifsc_code: Some("SBIN0001".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn reports_every_violation_at_once() {
        let form = SignupForm {
            email: Some("nope".to_string()),
            password: Some("123".to_string()),
            company_name: None,
            ..valid_form()
        };

        let AppError::BadRequest(message) = AppError::from(form.validate().unwrap_err()) else {
            panic!("expected a bad request");
        };
        assert_eq!(
            message,
            "Company name is required, Email should be valid, Password must be at least 6 characters"
        );
    }

    #[actix_web::test]
    async fn seeds_only_an_empty_store() {
        let store = db::MemoryStore::new();

        let seeded = seed_default_user(&store, 4).await.unwrap();
        assert_eq!(seeded.unwrap().email, DEFAULT_ADMIN_EMAIL);
        assert!(seed_default_user(&store, 4).await.unwrap().is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }
}
