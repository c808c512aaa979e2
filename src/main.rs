use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use cozy_condo_api::config::Config;
use cozy_condo_api::db::mongo::{create_mongo_client, Database};
use cozy_condo_api::routes;
use cozy_condo_api::services::stripe::provider::StripeProvider;

fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);
    match &config.cors_allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let client = create_mongo_client(&config.mongodb_uri)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let db = Database::new(client, config.database_name.clone());
    db.verify_connection().await;
    if let Err(e) = db.ensure_indexes().await {
        warn!("Could not create indexes: {}", e);
    }

    let stripe = match &config.stripe_secret_key {
        Some(key) => Some(web::Data::new(StripeProvider::new(
            key.as_str(),
            &config.stripe_currency,
        ))),
        None => {
            warn!("STRIPE_SECRET_KEY not set; checkout is disabled");
            None
        }
    };

    let bind = (config.host.clone(), config.port);
    info!("Starting HTTP server on {}:{}", bind.0, bind.1);

    let db = web::Data::new(db);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .wrap(cors(&config))
            .app_data(db.clone())
            .app_data(config.clone());
        if let Some(stripe) = &stripe {
            app = app.app_data(stripe.clone());
        }
        let jwt_secret = config.jwt_secret.clone();
        app.route("/health", web::get().to(routes::health::health_check))
            .configure(move |cfg| routes::configure(cfg, &jwt_secret))
    })
    .bind(bind)?
    .run()
    .await
}
