use std::sync::Arc;

use actix_web::{Responder, get, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use db::Store;

use crate::{dtos::company::CompanyInfoUpdate, services};

/// Gets the company profile of the signed-in user.
///
/// # Input
/// - `claims`: JWT claims of the authenticated user
/// - `store`: Company store
///
/// # Output
/// - Success: Returns the company info with its bank details
/// - Error: Returns 401 Unauthorized without a valid token
/// - Error: Returns 404 Not Found when the user has no company profile
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/company-info', {
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` }
/// });
/// const companyInfo = await response.json();
/// ```
#[get("")]
pub async fn get_company_info(
    claims: web::ReqData<JwtClaims>,
    store: web::Data<Arc<dyn Store>>,
) -> Res<impl Responder> {
    let info = services::company::get_company_info(store.get_ref().as_ref(), claims.user_id).await?;
    Success::ok(info)
}

/// Updates name, address and bank details of the signed-in user's company.
///
/// # Input
/// - `claims`: JWT claims of the authenticated user
/// - `body`: JSON with `companyName`, `companyAddress` and optional `bankDetails`
/// - `store`: Company store
///
/// # Output
/// - Success: Returns the updated company info
/// - Error: Returns 400 Bad Request for blank fields
/// - Error: Returns 404 Not Found when the user has no company profile
#[put("")]
pub async fn put_company_info(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<CompanyInfoUpdate>,
    store: web::Data<Arc<dyn Store>>,
) -> Res<impl Responder> {
    let info = services::company::update_company_info(
        store.get_ref().as_ref(),
        claims.user_id,
        body.into_inner(),
    )
    .await?;
    Success::ok(info)
}
