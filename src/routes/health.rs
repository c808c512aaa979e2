use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::config::Config;
use crate::db::mongo::Database;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details.into()),
        }
    }

    fn error(details: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details.into()),
        }
    }
}

pub async fn health_check(db: web::Data<Database>, config: web::Data<Config>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let checks = [
        ("mongodb", check_mongodb(&db).await),
        ("stripe", check_stripe(&config)),
    ];
    for (name, result) in checks {
        if result.status != "ok" {
            health.status = "degraded".to_string();
        }
        health.services.insert(name.to_string(), result);
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(db: &Database) -> ServiceStatus {
    match db.ping().await {
        Ok(_) => ServiceStatus::ok("Connected successfully to MongoDB"),
        Err(e) => {
            error!("MongoDB health check failed: {}", e);
            ServiceStatus::error(format!("Failed to connect: {}", e))
        }
    }
}

fn mask_key(key: &str) -> String {
    if key.len() > 8 {
        format!("{}***{}", &key[0..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}

fn check_stripe(config: &Config) -> ServiceStatus {
    match (&config.stripe_secret_key, &config.stripe_webhook_secret) {
        (Some(key), Some(_)) => {
            ServiceStatus::ok(format!("Stripe API key configured ({})", mask_key(key)))
        }
        (Some(_), None) => ServiceStatus::error("STRIPE_WEBHOOK_SECRET not configured"),
        (None, _) => ServiceStatus::error("STRIPE_SECRET_KEY not configured"),
    }
}
