use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder_name: String,
    pub ifsc_code: String,
    pub branch_name: Option<String>,
    pub branch_code: Option<String>,
}

/// Company profile owned by a user. Its bank details feed the payment
/// instructions printed on invoices and in invoice emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub company_address: String,
    /// `/uploads/...` reference of the stored logo.
    pub company_logo: Option<String>,
    pub bank_details: Option<BankDetails>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Flat row as stored in `company_info`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CompanyInfoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub company_address: String,
    pub company_logo: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_holder_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub branch_code: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CompanyInfoRow> for CompanyInfo {
    fn from(row: CompanyInfoRow) -> Self {
        let bank_details = match (
            row.bank_name,
            row.account_number,
            row.account_holder_name,
            row.ifsc_code,
        ) {
            (Some(bank_name), Some(account_number), Some(account_holder_name), Some(ifsc_code)) => {
                Some(BankDetails {
                    bank_name,
                    account_number,
                    account_holder_name,
                    ifsc_code,
                    branch_name: row.branch_name,
                    branch_code: row.branch_code,
                })
            }
            _ => None,
        };
        CompanyInfo {
            id: row.id,
            user_id: row.user_id,
            company_name: row.company_name,
            company_address: row.company_address,
            company_logo: row.company_logo,
            bank_details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
