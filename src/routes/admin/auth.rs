use actix_web::{web, HttpResponse};
use log::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::issue_token;
use crate::middleware::auth_context::AuthenticatedAdmin;
use crate::models::account::{AdminCredentials, AdminToken};
use crate::models::api::ApiResponse;

/// Single-owner login checked against `ADMIN_EMAIL` / `ADMIN_PASSWORD_HASH`.
pub fn check_credentials(config: &Config, credentials: &AdminCredentials) -> AppResult<()> {
    let (Some(email), Some(hash)) = (&config.admin_email, &config.admin_password_hash) else {
        warn!("Admin login attempted but ADMIN_EMAIL/ADMIN_PASSWORD_HASH are not set");
        return Err(AppError::Unauthorized);
    };

    let email_matches = email.eq_ignore_ascii_case(credentials.email.trim());
    let password_matches = bcrypt::verify(&credentials.password, hash).unwrap_or(false);
    if email_matches && password_matches {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/*
    POST /api/admin/login
*/
pub async fn login(
    config: web::Data<Config>,
    input: web::Json<AdminCredentials>,
) -> AppResult<HttpResponse> {
    let credentials = input.into_inner();
    check_credentials(&config, &credentials)?;

    let (token, expires_at) = issue_token(credentials.email.trim(), &config.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;
    info!("Admin {} signed in", credentials.email.trim());

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AdminToken { token, expires_at })))
}

/*
    GET /api/admin/session
*/
pub async fn session(admin: AuthenticatedAdmin) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "email": admin.email }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hash: Option<String>) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "cozy_condo_test".to_string(),
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            stripe_currency: "php".to_string(),
            site_url: "http://localhost:3000".to_string(),
            jwt_secret: "test_secret".to_string(),
            admin_email: Some("owner@cozycondo.ph".to_string()),
            admin_password_hash: hash,
            cors_allowed_origin: None,
        }
    }

    fn credentials(email: &str, password: &str) -> AdminCredentials {
        AdminCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_check_credentials() {
        let hash = bcrypt::hash("sunset-view", 4).unwrap();
        let config = config(Some(hash));

        assert!(check_credentials(&config, &credentials("Owner@CozyCondo.ph ", "sunset-view")).is_ok());
        assert!(matches!(
            check_credentials(&config, &credentials("owner@cozycondo.ph", "wrong")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            check_credentials(&config, &credentials("guest@example.com", "sunset-view")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_login_disabled_without_hash() {
        let config = config(None);
        assert!(matches!(
            check_credentials(&config, &credentials("owner@cozycondo.ph", "anything")),
            Err(AppError::Unauthorized)
        ));
    }
}
