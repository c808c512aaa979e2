use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

use crate::db::mongo::Database;
use crate::error::AppResult;
use crate::models::api::ApiResponse;
use crate::models::settings::SiteSettings;

const DEFAULT_SITE_NAME: &str = "Cozy Condo";

/*
    GET /api/settings
*/
pub async fn get_settings(db: web::Data<Database>) -> AppResult<HttpResponse> {
    let settings = db
        .site_settings()
        .find_one(doc! {})
        .await?
        .unwrap_or_else(|| SiteSettings {
            site_name: DEFAULT_SITE_NAME.to_string(),
            ..Default::default()
        });

    Ok(HttpResponse::Ok().json(ApiResponse::ok(settings)))
}
