use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::company::{CompanyCreateRequest, CompanyUpdateRequest},
    models::company::{BankDetails, CompanyInfo, CompanyInfoRow},
};

fn bank_columns(
    bank: &Option<BankDetails>,
) -> (
    Option<&str>,
    Option<&str>,
    Option<&str>,
    Option<&str>,
    Option<&str>,
    Option<&str>,
) {
    match bank {
        Some(b) => (
            Some(b.bank_name.as_str()),
            Some(b.account_number.as_str()),
            Some(b.account_holder_name.as_str()),
            Some(b.ifsc_code.as_str()),
            b.branch_name.as_deref(),
            b.branch_code.as_deref(),
        ),
        None => (None, None, None, None, None, None),
    }
}

pub async fn insert_company_info<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &CompanyCreateRequest,
) -> Res<CompanyInfo> {
    let (bank_name, account_number, holder, ifsc, branch_name, branch_code) =
        bank_columns(&data.bank_details);
    sqlx::query_as::<_, CompanyInfoRow>(
        r#"
        INSERT INTO company_info (
            user_id, company_name, company_address, company_logo,
            bank_name, account_number, account_holder_name, ifsc_code, branch_name, branch_code
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(&data.company_name)
    .bind(&data.company_address)
    .bind(&data.company_logo)
    .bind(bank_name)
    .bind(account_number)
    .bind(holder)
    .bind(ifsc)
    .bind(branch_name)
    .bind(branch_code)
    .fetch_one(executor)
    .await
    .map(CompanyInfo::from)
    .map_err(AppError::from)
}

pub async fn get_company_info_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<CompanyInfo>> {
    sqlx::query_as::<_, CompanyInfoRow>("SELECT * FROM company_info WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map(|row| row.map(CompanyInfo::from))
        .map_err(AppError::from)
}

pub async fn update_company_info<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    data: &CompanyUpdateRequest,
) -> Res<Option<CompanyInfo>> {
    let (bank_name, account_number, holder, ifsc, branch_name, branch_code) =
        bank_columns(&data.bank_details);
    sqlx::query_as::<_, CompanyInfoRow>(
        r#"
        UPDATE company_info SET
            company_name = $2,
            company_address = $3,
            company_logo = COALESCE($4, company_logo),
            bank_name = $5,
            account_number = $6,
            account_holder_name = $7,
            ifsc_code = $8,
            branch_name = $9,
            branch_code = $10,
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&data.company_name)
    .bind(&data.company_address)
    .bind(&data.company_logo)
    .bind(bank_name)
    .bind(account_number)
    .bind(holder)
    .bind(ifsc)
    .bind(branch_name)
    .bind(branch_code)
    .fetch_optional(executor)
    .await
    .map(|row| row.map(CompanyInfo::from))
    .map_err(AppError::from)
}
