use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use userdir_auth::TokenService;

use crate::app::errors;
use crate::context::CallerContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
}

/// Verify the bearer token and attach the caller's claims to the request.
///
/// Failures respond with 401 and a JSON body; expired and invalid tokens
/// carry distinct messages.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let claims = match state.tokens.verify(token) {
        Ok(c) => c,
        Err(e) => return errors::token_error_to_response(e),
    };

    req.extensions_mut().insert(CallerContext::new(claims));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let unauthorized = || errors::unauthenticated("no token provided");

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(unauthorized)?;

    let header = header.to_str().map_err(|_| unauthorized())?;

    let header = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    Ok(token)
}
