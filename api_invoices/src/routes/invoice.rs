use std::sync::Arc;

use actix_web::{Responder, delete, get, post, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use db::Store;
use uuid::Uuid;

use crate::{
    dtos::invoice::{InvoiceRequest, InvoiceResponse},
    service,
};

/// Creates an invoice for the authenticated user.
///
/// # Arguments
///
/// * `claims` - The JWT claims of the authenticated user.
/// * `store` - The invoice store.
/// * `req` - Invoice fields with their services.
///
/// # Returns
///
/// 201 with the stored invoice and its totals, or 400 listing every invalid field.
#[post("")]
pub async fn post_invoice(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    req: web::Json<InvoiceRequest>,
) -> Res<impl Responder> {
    let invoice = service::invoice::create_invoice(
        store.get_ref().as_ref(),
        claims.user_id,
        req.into_inner(),
    )
    .await?;
    Success::created(invoice)
}

/// Lists the authenticated user's invoices, newest first.
#[get("")]
pub async fn get_invoices(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
) -> Res<impl Responder> {
    let invoices = service::invoice::list_invoices(store.get_ref().as_ref(), claims.user_id).await?;
    Success::ok(invoices)
}

/// Lists the invoices issued to one employee, newest first.
///
/// # Arguments
///
/// * `claims` - The JWT claims of the authenticated user.
/// * `store` - The invoice store.
/// * `path` - The employee id as entered on the invoices.
///
/// # Returns
///
/// The matching invoices. An unknown employee gives an empty list.
#[get("/employee/{employee_id}")]
pub async fn get_invoices_by_employee(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    path: web::Path<String>,
) -> Res<impl Responder> {
    let invoices = service::invoice::list_invoices_by_employee(
        store.get_ref().as_ref(),
        claims.user_id,
        &path,
    )
    .await?;
    Success::ok(invoices)
}

#[get("/{id}")]
pub async fn get_invoice(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    let invoice =
        service::invoice::get_invoice(store.get_ref().as_ref(), claims.user_id, *path).await?;
    Success::ok(InvoiceResponse::from(invoice))
}

/// Replaces an invoice's fields.
///
/// # Arguments
///
/// * `claims` - The JWT claims of the authenticated user.
/// * `store` - The invoice store.
/// * `path` - The invoice id.
/// * `req` - The new invoice fields.
///
/// # Returns
///
/// The updated invoice, 400 for invalid fields or 404 when the invoice does not exist.
#[put("/{id}")]
pub async fn put_invoice(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    path: web::Path<Uuid>,
    req: web::Json<InvoiceRequest>,
) -> Res<impl Responder> {
    let invoice = service::invoice::update_invoice(
        store.get_ref().as_ref(),
        claims.user_id,
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Success::ok(invoice)
}

#[delete("/{id}")]
pub async fn delete_invoice(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
    path: web::Path<Uuid>,
) -> Res<impl Responder> {
    service::invoice::delete_invoice(store.get_ref().as_ref(), claims.user_id, *path).await?;
    Success::message("Invoice deleted successfully")
}
