use common::error::{AppError, Res};
use db::{Store, models::invoice::Invoice};
use uuid::Uuid;

use crate::dtos::invoice::{InvoiceRequest, InvoiceResponse};

pub fn not_found(invoice_id: Uuid) -> AppError {
    AppError::NotFound(format!("Invoice not found with id: {}", invoice_id))
}

/// Validates and stores a new invoice owned by `owner`.
pub async fn create_invoice(
    store: &dyn Store,
    owner: Uuid,
    req: InvoiceRequest,
) -> Res<InvoiceResponse> {
    let data = req.into_data()?;
    let invoice = store.insert_invoice(owner, data).await?;
    log::info!(
        "Invoice #{} ({}) created by user {}",
        invoice.invoice_number,
        invoice.id,
        owner
    );
    Ok(invoice.into())
}

/// Fetches one invoice of `owner`. Another user's invoice is reported as missing.
pub async fn get_invoice(store: &dyn Store, owner: Uuid, invoice_id: Uuid) -> Res<Invoice> {
    store
        .get_invoice(owner, invoice_id)
        .await?
        .ok_or_else(|| not_found(invoice_id))
}

pub async fn list_invoices(store: &dyn Store, owner: Uuid) -> Res<Vec<InvoiceResponse>> {
    let invoices = store.list_invoices(owner).await?;
    Ok(invoices.into_iter().map(InvoiceResponse::from).collect())
}

pub async fn list_invoices_by_employee(
    store: &dyn Store,
    owner: Uuid,
    employee_id: &str,
) -> Res<Vec<InvoiceResponse>> {
    let invoices = store
        .list_invoices_by_employee(owner, employee_id.trim())
        .await?;
    Ok(invoices.into_iter().map(InvoiceResponse::from).collect())
}

/// Replaces every editable field. The id, owner and creation time stay.
pub async fn update_invoice(
    store: &dyn Store,
    owner: Uuid,
    invoice_id: Uuid,
    req: InvoiceRequest,
) -> Res<InvoiceResponse> {
    let data = req.into_data()?;
    let invoice = store
        .update_invoice(owner, invoice_id, data)
        .await?
        .ok_or_else(|| not_found(invoice_id))?;
    log::info!("Invoice {} updated by user {}", invoice.id, owner);
    Ok(invoice.into())
}

pub async fn delete_invoice(store: &dyn Store, owner: Uuid, invoice_id: Uuid) -> Res<()> {
    if !store.delete_invoice(owner, invoice_id).await? {
        return Err(not_found(invoice_id));
    }
    log::info!("Invoice {} deleted by user {}", invoice_id, owner);
    Ok(())
}
