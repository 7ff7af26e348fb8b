use crate::auth::auth::token_from_request;
use crate::auth::session::session_from_token;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use tracing::debug;

/// Resolves the session of every protected request and stores it as an
/// `AuthUser` request extension. Requests without a valid session are sent
/// back to the login page.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let token = match token_from_request(req.request()) {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Login required", "redirect": "/login"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let auth_user = match session_from_token(&token, &config.secret_key) {
        Ok(u) => u,
        Err(e) => {
            debug!(error = %e, path = %req.path(), "Rejected session");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Invalid or expired session", "redirect": "/login"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
