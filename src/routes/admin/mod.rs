use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

pub mod auth;
pub mod bookings;
pub mod properties;
pub mod revenue;

pub fn config(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.service(
        web::scope("/admin")
            .route("/login", web::post().to(auth::login))
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::new(jwt_secret))
                    .route("/session", web::get().to(auth::session))
                    .route("/bookings", web::get().to(bookings::list_bookings))
                    .route(
                        "/bookings/{id}/status",
                        web::patch().to(bookings::update_status),
                    )
                    .route("/properties", web::get().to(properties::list_all))
                    .route("/properties/{id}", web::patch().to(properties::update_flags))
                    .route("/revenue", web::get().to(revenue::revenue_report)),
            ),
    );
}
