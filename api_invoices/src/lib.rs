use actix_web::web;

pub mod routes {
    pub mod document;
    pub mod invoice;
}

pub mod service {
    pub mod document;
    pub mod invoice;
}
pub mod dtos {
    pub mod invoice;
}

/// Client-supplied PDFs for send-email may exceed the default payload limit.
const MAX_PDF_BODY_BYTES: usize = 20 * 1024 * 1024;

/// `/invoices` scope. Every route needs the caller's claims, so it must be
/// wrapped with the auth middleware.
pub fn mount_invoices() -> actix_web::Scope {
    web::scope("/invoices")
        .app_data(web::PayloadConfig::new(MAX_PDF_BODY_BYTES))
        .service(routes::invoice::post_invoice)
        .service(routes::invoice::get_invoices)
        // ahead of `/{id}/download`, which also matches `/employee/download`
        .service(routes::invoice::get_invoices_by_employee)
        .service(routes::invoice::get_invoice)
        .service(routes::invoice::put_invoice)
        .service(routes::invoice::delete_invoice)
        .service(routes::document::get_download)
        .service(routes::document::post_send_email)
}
