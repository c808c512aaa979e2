use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use log::info;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
};

use crate::db::mongo::Database;
use crate::error::{AppError, AppResult};
use crate::models::api::ApiResponse;
use crate::models::property::{Property, PropertyDetails, PropertyFlagsUpdate};

pub fn flags_document(update: &PropertyFlagsUpdate) -> AppResult<Document> {
    let mut set = doc! {};
    if let Some(active) = update.active {
        set.insert("active", active);
    }
    if let Some(featured) = update.featured {
        set.insert("featured", featured);
    }
    if set.is_empty() {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }
    set.insert("updated_at", Utc::now().to_rfc3339());
    Ok(set)
}

/*
    GET /api/admin/properties
*/
pub async fn list_all(db: web::Data<Database>) -> AppResult<HttpResponse> {
    let options = FindOptions::builder()
        .sort(doc! { "display_order": 1, "name": 1 })
        .build();
    let properties: Vec<Property> = db
        .properties()
        .find(doc! {})
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    let details: Vec<PropertyDetails> = properties.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
}

/*
    PATCH /api/admin/properties/{id}
*/
pub async fn update_flags(
    db: web::Data<Database>,
    path: web::Path<String>,
    input: web::Json<PropertyFlagsUpdate>,
) -> AppResult<HttpResponse> {
    let property_id = path.into_inner();
    let object_id = ObjectId::parse_str(&property_id)
        .map_err(|_| AppError::Validation("Invalid property ID".to_string()))?;
    let set = flags_document(&input)?;

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let property = db
        .properties()
        .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set })
        .with_options(options)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;
    info!(
        "Property {} flags updated (active: {}, featured: {})",
        property.slug, property.active, property.featured
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PropertyDetails::from(property))))
}
