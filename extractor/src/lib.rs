//! Bearer token decoding shared by every route.
//!
//! The middleware never rejects a request. Rejection is left to the auth
//! middleware of the protected scopes, which reads the stored outcome.

use middleware::bearer::BearerClaimsMiddleware;

pub mod middleware {
    pub mod bearer;
}

pub fn middleware() -> BearerClaimsMiddleware {
    BearerClaimsMiddleware::new()
}
