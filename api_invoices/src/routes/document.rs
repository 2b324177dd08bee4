use std::sync::Arc;

use actix_web::{
    HttpResponse, Responder, get,
    http::header::CONTENT_DISPOSITION,
    post, web,
};
use common::{error::Res, http::Success, jwt::JwtClaims};
use db::Store;
use mailer::Dispatcher;
use uuid::Uuid;

use crate::service;

/// Downloads the invoice as a PDF.
///
/// # Input
/// - `claims`: JWT claims of the authenticated user
/// - `store`: Invoice and company store
/// - `path`: Invoice id
///
/// # Output
/// - Success: `application/pdf` body with `Content-Disposition: attachment; filename="Invoice_{number}.pdf"`
/// - Error: Returns 404 Not Found for an unknown invoice
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/invoices/${id}/download`, {
///   headers: { 'Authorization': `Bearer ${token}` }
/// });
/// const url = URL.createObjectURL(await response.blob());
/// window.open(url);
/// ```
#[get("/{id}/download")]
pub async fn get_download(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let (invoice, bytes) =
        service::document::render_invoice_pdf(store.get_ref().as_ref(), claims.user_id, *path)
            .await?;
    let file_name = pdf::file_name(&invoice.invoice_number);
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(bytes))
}

/// Emails the invoice to the employee in the background.
///
/// # Input
/// - `claims`: JWT claims of the authenticated user
/// - `store`: Invoice and company store
/// - `dispatcher`: Email dispatcher
/// - `path`: Invoice id
/// - `body`: Optional client-rendered PDF (`application/pdf` or `application/octet-stream`).
///   When empty the server renders the PDF itself.
///
/// # Output
/// - Success: `{ "message": "Invoice email is being sent to {email}" }`, before delivery finishes
/// - Error: Returns 400 Bad Request for an invalid recipient address
/// - Error: Returns 404 Not Found for an unknown invoice
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/invoices/${id}/send-email`, {
///   method: 'POST',
///   headers: {
///     'Authorization': `Bearer ${token}`,
///     'Content-Type': 'application/pdf'
///   },
///   body: pdfBlob // optional
/// });
/// const { message } = await response.json();
/// ```
#[post("/{id}/send-email")]
pub async fn post_send_email(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    dispatcher: web::Data<Arc<Dispatcher>>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Res<impl Responder> {
    let pdf = (!body.is_empty()).then(|| body.to_vec());
    let scheduled = service::document::schedule_invoice_email(
        store.get_ref().as_ref(),
        dispatcher.get_ref().clone(),
        claims.user_id,
        *path,
        pdf,
    )
    .await?;
    Success::message(format!(
        "Invoice email is being sent to {}",
        scheduled.recipient
    ))
}
