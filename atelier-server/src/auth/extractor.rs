//! JWT Extractor
//!
//! Custom extractor for protected handlers: validates the bearer token, then
//! re-reads the admin record from the store so that deactivated accounts are
//! caught immediately. The token payload is only trusted for the subject
//! email.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::JwtService;
use crate::core::ServerState;
use crate::db::models::Admin;
use crate::db::repository::AdminRepository;
use crate::security_log;
use crate::utils::AppError;

/// Currently authenticated admin, resolved from the `Authorization` header
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

impl FromRequestParts<ServerState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or(AppError::InvalidToken)?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::Unauthorized);
            }
        };

        // Validate token
        let jwt_service = state.jwt_service();
        let claims = match jwt_service.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );

                return match e {
                    crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                    _ => Err(AppError::InvalidToken),
                };
            }
        };

        // Re-fetch the admin: the token proves identity, the store decides
        // whether the account still exists and is active
        let admins = AdminRepository::new(state.store());
        let admin = admins
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !admin.is_active {
            security_log!("WARN", "inactive_admin", email = claims.sub.clone());
            return Err(AppError::forbidden("Account has been disabled"));
        }

        Ok(CurrentAdmin(admin))
    }
}
