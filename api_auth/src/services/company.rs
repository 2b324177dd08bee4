use common::error::{AppError, Res};
use db::{
    Store,
    dtos::company::CompanyUpdateRequest,
    models::company::{BankDetails, CompanyInfo},
};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::company::CompanyInfoUpdate;

fn not_found() -> AppError {
    AppError::NotFound("Company information not found for this user".to_string())
}

pub async fn get_company_info(store: &dyn Store, user_id: Uuid) -> Res<CompanyInfo> {
    store
        .get_company_info_by_user(user_id)
        .await?
        .ok_or_else(not_found)
}

/// Replaces name and address. Bank details are replaced only when supplied,
/// the logo is never touched here.
pub async fn update_company_info(
    store: &dyn Store,
    user_id: Uuid,
    update: CompanyInfoUpdate,
) -> Res<CompanyInfo> {
    update.validate()?;

    let current = get_company_info(store, user_id).await?;
    let request = CompanyUpdateRequest {
        company_name: update.company_name.unwrap_or_default().trim().to_string(),
        company_address: update.company_address.unwrap_or_default().trim().to_string(),
        company_logo: None,
        bank_details: update
            .bank_details
            .map(BankDetails::from)
            .or(current.bank_details),
    };

    let info = store
        .update_company_info(user_id, request)
        .await?
        .ok_or_else(not_found)?;
    log::info!("Company info {} updated by user {}", info.id, user_id);
    Ok(info)
}
