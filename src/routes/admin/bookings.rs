use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use log::info;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::FindOptions,
};
use serde::Deserialize;

use crate::db::mongo::Database;
use crate::error::{AppError, AppResult};
use crate::middleware::auth_context::AuthenticatedAdmin;
use crate::models::api::ApiResponse;
use crate::models::bookings::{Booking, BookingListItem, BookingStatus, StatusUpdate};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub property_id: Option<String>,
}

pub fn filter_document(filter: &BookingFilter) -> AppResult<Document> {
    let mut query = doc! {};
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(property_id) = &filter.property_id {
        let id = ObjectId::parse_str(property_id)
            .map_err(|_| AppError::Validation("Invalid property ID".to_string()))?;
        query.insert("property_id", id);
    }
    Ok(query)
}

/*
    GET /api/admin/bookings?status=pending&propertyId=...
*/
pub async fn list_bookings(
    db: web::Data<Database>,
    params: web::Query<BookingFilter>,
) -> AppResult<HttpResponse> {
    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();

    let bookings: Vec<Booking> = db
        .bookings()
        .find(filter_document(&params)?)
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    let items: Vec<BookingListItem> = bookings.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(items)))
}

/*
    PATCH /api/admin/bookings/{id}/status
*/
pub async fn update_status(
    admin: AuthenticatedAdmin,
    db: web::Data<Database>,
    path: web::Path<String>,
    input: web::Json<StatusUpdate>,
) -> AppResult<HttpResponse> {
    let booking_id = path.into_inner();
    let object_id = ObjectId::parse_str(&booking_id)
        .map_err(|_| AppError::Validation("Invalid booking ID".to_string()))?;
    let next = input.into_inner().status;

    let bookings = db.bookings();
    let booking = bookings
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if !booking.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Cannot change a {} booking to {}",
            booking.status, next
        )));
    }

    // Guarded on the status we read so a concurrent webhook is not overwritten.
    let result = bookings
        .update_one(
            doc! { "_id": object_id, "status": booking.status.as_str() },
            doc! { "$set": {
                "status": next.as_str(),
                "updated_at": Utc::now().to_rfc3339(),
            }},
        )
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::Conflict(
            "Booking was modified by another request".to_string(),
        ));
    }
    info!(
        "{} moved booking {} from {} to {}",
        admin.email, booking_id, booking.status, next
    );

    let mut updated = booking;
    updated.status = next;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(BookingListItem::from(updated))))
}
