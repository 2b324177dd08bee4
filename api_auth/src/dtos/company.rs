use common::validate::not_blank;
use db::models::company::BankDetails;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `PUT /auth/company-info`. Absent bank details keep the stored ones.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfoUpdate {
    #[validate(
        required(message = "Company name is required"),
        custom(function = "not_blank", message = "Company name is required")
    )]
    pub company_name: Option<String>,
    #[validate(
        required(message = "Company address is required"),
        custom(function = "not_blank", message = "Company address is required")
    )]
    pub company_address: Option<String>,
    #[validate(nested)]
    pub bank_details: Option<BankDetailsUpdate>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailsUpdate {
    #[validate(custom(function = "not_blank", message = "Bank name is required"))]
    pub bank_name: String,
    #[validate(custom(function = "not_blank", message = "Account number is required"))]
    pub account_number: String,
    #[validate(custom(function = "not_blank", message = "Account holder name is required"))]
    pub account_holder_name: String,
    #[validate(custom(function = "not_blank", message = "IFSC code is required"))]
    pub ifsc_code: String,
    pub branch_name: Option<String>,
    pub branch_code: Option<String>,
}

impl From<BankDetailsUpdate> for BankDetails {
    fn from(update: BankDetailsUpdate) -> Self {
        let optional = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        BankDetails {
            bank_name: update.bank_name.trim().to_string(),
            account_number: update.account_number.trim().to_string(),
            account_holder_name: update.account_holder_name.trim().to_string(),
            ifsc_code: update.ifsc_code.trim().to_string(),
            branch_name: optional(update.branch_name),
            branch_code: optional(update.branch_code),
        }
    }
}
