use actix_web::web;
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}
pub mod dtos {
    pub mod auth;
    pub mod company;
}
mod routes {
    pub(crate) mod auth;
    pub(crate) mod company;
}
pub mod services {
    pub mod auth;
    pub mod company;
    pub mod user;
}

// Auth middleware
pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new()
}

/// `/auth` scope. Company-info routes sit behind the bearer check,
/// everything else is public.
pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_login)
        .service(routes::auth::post_signup)
        .service(routes::auth::post_validate)
        .service(routes::auth::get_health)
        .service(
            web::scope("/company-info")
                .wrap(auth_middleware())
                .service(routes::company::get_company_info)
                .service(routes::company::put_company_info),
        )
}
