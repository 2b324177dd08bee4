use std::sync::Arc;

use actix_web::web;
use common::error::{AppError, Res};
use db::{Store, models::invoice::Invoice};
use mailer::{Delivery, Dispatcher};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::service::invoice;

/// Renders the owner's invoice on the blocking pool.
pub async fn render_invoice_pdf(
    store: &dyn Store,
    owner: Uuid,
    invoice_id: Uuid,
) -> Res<(Invoice, Vec<u8>)> {
    let invoice = invoice::get_invoice(store, owner, invoice_id).await?;
    let company = store.get_company_info_by_user(owner).await?;

    let to_render = invoice.clone();
    let bytes = web::block(move || pdf::render_invoice(&to_render, company.as_ref()))
        .await
        .map_err(|e| AppError::Pdf(format!("Rendering was cancelled: {}", e)))??;
    log::debug!(
        "Rendered invoice #{} ({} bytes)",
        invoice.invoice_number,
        bytes.len()
    );
    Ok((invoice, bytes))
}

/// A dispatch that has been accepted and runs in the background.
pub struct ScheduledEmail {
    pub recipient: String,
    pub task: JoinHandle<()>,
}

/// Validates synchronously, then hands the delivery to a spawned task.
///
/// # Arguments
///
/// * `store` - The invoice and company store.
/// * `dispatcher` - Shared email dispatcher.
/// * `owner` - Id of the authenticated user.
/// * `invoice_id` - Invoice to send.
/// * `pdf` - Client-rendered PDF. When `None` the PDF is rendered inside the task.
///
/// # Returns
///
/// The recipient address once the task is scheduled, `NotFound` for an unknown invoice
/// or `BadRequest` when the recipient or the supplied PDF is unusable. Delivery failures
/// are only logged.
pub async fn schedule_invoice_email(
    store: &dyn Store,
    dispatcher: Arc<Dispatcher>,
    owner: Uuid,
    invoice_id: Uuid,
    pdf: Option<Vec<u8>>,
) -> Res<ScheduledEmail> {
    let invoice = invoice::get_invoice(store, owner, invoice_id).await?;
    match &pdf {
        Some(bytes) => Dispatcher::validate(&invoice, bytes)?,
        None => Dispatcher::validate_recipient(&invoice)?,
    }
    let company = store.get_company_info_by_user(owner).await?;
    let recipient = invoice.employee_email.clone();

    let task = tokio::spawn(async move {
        let result = match pdf {
            Some(pdf) => {
                dispatcher
                    .send_with_pdf(&invoice, company.as_ref(), pdf)
                    .await
            }
            None => dispatcher.send_invoice(&invoice, company.as_ref()).await,
        };
        match result {
            Ok(Delivery::Attached { attempts, .. }) => log::info!(
                "Invoice #{} emailed to {} as attachment after {} attempt(s)",
                invoice.invoice_number,
                invoice.employee_email,
                attempts
            ),
            Ok(Delivery::Link { url, attempts, .. }) => log::info!(
                "Invoice #{} emailed to {} as download link {} after {} attempt(s)",
                invoice.invoice_number,
                invoice.employee_email,
                url,
                attempts
            ),
            Err(e) => log::error!("{}", e),
        }
    });

    log::info!("Invoice {} email to {} scheduled", invoice_id, recipient);
    Ok(ScheduledEmail { recipient, task })
}
