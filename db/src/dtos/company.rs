use uuid::Uuid;

use crate::models::company::BankDetails;

pub struct CompanyCreateRequest {
    pub user_id: Uuid,
    pub company_name: String,
    pub company_address: String,
    pub company_logo: Option<String>,
    pub bank_details: Option<BankDetails>,
}

/// Replaces the editable profile fields. The logo is only replaced when `Some`.
pub struct CompanyUpdateRequest {
    pub company_name: String,
    pub company_address: String,
    pub company_logo: Option<String>,
    pub bank_details: Option<BankDetails>,
}
