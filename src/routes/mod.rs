use actix_web::web;
use log::warn;

use crate::error::AppError;

pub mod admin;
pub mod bookings;
pub mod health;
pub mod payment;
pub mod properties;
pub mod settings;

fn bad_request(err: impl std::fmt::Display) -> actix_web::Error {
    warn!("Rejected request: {}", err);
    AppError::Validation(err.to_string()).into()
}

/// Malformed bodies and queries use the same `{success, error}` envelope as handler errors.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err)));
}

pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.service(
        web::scope("/api")
            .configure(extractor_config)
            .route("/settings", web::get().to(settings::get_settings))
            .service(
                web::scope("/properties")
                    .route("", web::get().to(properties::list_properties))
                    .route("/{slug}", web::get().to(properties::get_property))
                    .route("/{slug}/calendar", web::get().to(properties::get_calendar)),
            )
            .route("/bookings", web::post().to(bookings::create_booking))
            .service(
                web::scope("/payments")
                    .route("/create-checkout", web::post().to(payment::create_checkout))
                    .route("/webhook", web::post().to(payment::handle_stripe_webhook)),
            )
            .configure(|cfg| admin::config(cfg, jwt_secret)),
    );
}
