#![allow(dead_code)]

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use chrono::{Duration, NaiveDate, Utc};
use tokio::time::sleep;
use url::Url;

use cozy_condo_api::config::Config;
use cozy_condo_api::db::mongo::{create_mongo_client, Database};
use cozy_condo_api::models::api::ApiResponse;
use cozy_condo_api::models::property::{PropertyDetails, PropertyPricing};
use cozy_condo_api::routes;

pub const JWT_SECRET: &str = "integration_test_secret";

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        mongodb_uri: std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        database_name: "cozy_condo_test".to_string(),
        stripe_secret_key: None,
        stripe_webhook_secret: None,
        stripe_currency: "php".to_string(),
        site_url: "http://localhost:3000".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        admin_email: None,
        admin_password_hash: None,
        cors_allowed_origin: None,
    }
}

/// The real route table backed by a lazily connecting Mongo client, so
/// requests rejected before any query need no running database.
pub struct TestApp {
    pub db: Database,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let client = create_mongo_client(&config.mongodb_uri)
            .await
            .expect("valid MongoDB URI");
        let db = Database::new(client, config.database_name.clone());
        Self { db, config }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.db.clone()))
            .app_data(web::Data::new(self.config.clone()))
            .route("/", web::get().to(|| async { "Cozy Condo API is running" }))
            .configure(|cfg| routes::configure(cfg, JWT_SECRET))
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_now(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn azure_loft() -> PropertyDetails {
    PropertyDetails {
        id: "665f1c2e8a1b2c3d4e5f6a7b".to_string(),
        slug: "azure-loft".to_string(),
        name: "Azure Loft".to_string(),
        location: Some("Cebu City".to_string()),
        description: None,
        amenities: vec!["wifi".to_string(), "pool".to_string()],
        featured: true,
        pricing: PropertyPricing {
            nightly_rate: 2500.0,
            cleaning_fee: 500.0,
            parking_fee: 200.0,
            admin_fee_percent: 10.0,
            max_guests: 4,
            min_nights: Some(2),
            max_nights: None,
        },
    }
}

pub fn failure(message: &str) -> ApiResponse<()> {
    ApiResponse::failure(message)
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

/// Runs a stub site on an ephemeral port and returns its base URL.
pub async fn serve<F>(configure: F) -> Url
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || {
        App::new()
            .route("/health", web::get().to(health_check))
            .configure(configure.clone())
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind stub server");
    let port = server.addrs()[0].port();
    actix_rt::spawn(server.run());
    wait_for_server_ready(port).await;
    Url::parse(&format!("http://127.0.0.1:{}/", port)).expect("stub url")
}

pub async fn wait_for_server_ready(port: u16) {
    for _ in 0..30 {
        if reqwest::get(&format!("http://127.0.0.1:{}/health", port)).await.is_ok() {
            return;
        }
        sleep(std::time::Duration::from_millis(100)).await;
    }
    panic!("Server failed to start within timeout");
}
