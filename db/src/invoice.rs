use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, types::Json};
use uuid::Uuid;

use crate::{
    dtos::invoice::InvoiceData,
    models::invoice::{Invoice, InvoiceRow},
};

pub async fn insert_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    created_by: Uuid,
    data: &InvoiceData,
) -> Res<Invoice> {
    sqlx::query_as::<_, InvoiceRow>(
        r#"
        INSERT INTO invoices (
            invoice_number, date, employee_name, employee_id, employee_email,
            employee_address, employee_mobile, services, tax_rate, created_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&data.invoice_number)
    .bind(&data.date)
    .bind(&data.employee_name)
    .bind(&data.employee_id)
    .bind(&data.employee_email)
    .bind(&data.employee_address)
    .bind(&data.employee_mobile)
    .bind(Json(&data.services))
    .bind(data.tax_rate)
    .bind(created_by)
    .fetch_one(executor)
    .await
    .map(Invoice::from)
    .map_err(AppError::from)
}

pub async fn get_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner: Uuid,
    invoice_id: Uuid,
) -> Res<Option<Invoice>> {
    sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices WHERE id = $1 AND created_by = $2")
        .bind(invoice_id)
        .bind(owner)
        .fetch_optional(executor)
        .await
        .map(|row| row.map(Invoice::from))
        .map_err(AppError::from)
}

pub async fn list_invoices<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner: Uuid,
) -> Res<Vec<Invoice>> {
    sqlx::query_as::<_, InvoiceRow>(
        "SELECT * FROM invoices WHERE created_by = $1 ORDER BY created_at DESC",
    )
    .bind(owner)
    .fetch_all(executor)
    .await
    .map(|rows| rows.into_iter().map(Invoice::from).collect())
    .map_err(AppError::from)
}

pub async fn list_invoices_by_employee<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner: Uuid,
    employee_id: &str,
) -> Res<Vec<Invoice>> {
    sqlx::query_as::<_, InvoiceRow>(
        r#"
        SELECT * FROM invoices
        WHERE created_by = $1 AND employee_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner)
    .bind(employee_id)
    .fetch_all(executor)
    .await
    .map(|rows| rows.into_iter().map(Invoice::from).collect())
    .map_err(AppError::from)
}

pub async fn update_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner: Uuid,
    invoice_id: Uuid,
    data: &InvoiceData,
) -> Res<Option<Invoice>> {
    sqlx::query_as::<_, InvoiceRow>(
        r#"
        UPDATE invoices SET
            invoice_number = $3,
            date = $4,
            employee_name = $5,
            employee_id = $6,
            employee_email = $7,
            employee_address = $8,
            employee_mobile = $9,
            services = $10,
            tax_rate = $11,
            updated_at = NOW()
        WHERE id = $1 AND created_by = $2
        RETURNING *
        "#,
    )
    .bind(invoice_id)
    .bind(owner)
    .bind(&data.invoice_number)
    .bind(&data.date)
    .bind(&data.employee_name)
    .bind(&data.employee_id)
    .bind(&data.employee_email)
    .bind(&data.employee_address)
    .bind(&data.employee_mobile)
    .bind(Json(&data.services))
    .bind(data.tax_rate)
    .fetch_optional(executor)
    .await
    .map(|row| row.map(Invoice::from))
    .map_err(AppError::from)
}

pub async fn delete_invoice<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner: Uuid,
    invoice_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND created_by = $2")
        .bind(invoice_id)
        .bind(owner)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
