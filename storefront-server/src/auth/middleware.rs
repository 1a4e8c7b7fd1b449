//! Authentication middleware
//!
//! Guards the admin-only routes. The storefront endpoints (checkout, order
//! lookup, webhook) stay public; everything behind this middleware requires
//! a valid admin bearer token.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::{AdminSession, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Admin middleware - requires a valid `Authorization: Bearer <token>` header
/// carrying the admin role
///
/// On success an [`AdminSession`] is injected into the request extensions.
///
/// # Errors
///
/// | Condition | Response |
/// |-----------|----------|
/// | Missing/invalid header | 401 Unauthorized |
/// | Expired token | 401 TokenExpired |
/// | Bad signature / claims | 401 InvalidToken |
/// | Valid token, non-admin role | 403 Forbidden |
pub async fn require_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Allow CORS preflight through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
        }
        None => {
            tracing::warn!(uri = %req.uri(), "Admin request without authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            if claims.role != "admin" {
                tracing::warn!(role = %claims.role, "Token without admin role rejected");
                return Err(AppError::Forbidden("Admin role required".to_string()));
            }
            req.extensions_mut().insert(AdminSession::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %req.uri(), "Admin token rejected");
            match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}
