use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions};
use serde::Deserialize;

use crate::booking::dates::DateRange;
use crate::db::mongo::Database;
use crate::error::{AppError, AppResult};
use crate::models::api::ApiResponse;
use crate::models::calendar::{Availability, CalendarQuery};
use crate::models::property::{Property, PropertyDetails, PropertySummary};
use crate::services::availability_service::{blocked_nights, load_calendar};

/// Longest calendar window a single request may ask for.
const MAX_CALENDAR_DAYS: i64 = 731;
const DEFAULT_CALENDAR_DAYS: i64 = 365;

#[derive(Deserialize)]
pub struct ListParams {
    featured: Option<bool>,
}

pub async fn find_active_property(db: &Database, slug: &str) -> AppResult<Property> {
    db.properties()
        .find_one(doc! { "slug": slug, "active": true })
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))
}

/*
    GET /api/properties
*/
pub async fn list_properties(
    db: web::Data<Database>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let mut filter = doc! { "active": true };
    if let Some(featured) = params.featured {
        filter.insert("featured", featured);
    }
    let options = FindOptions::builder()
        .sort(doc! { "display_order": 1, "name": 1 })
        .build();

    let properties: Vec<Property> = db
        .properties()
        .find(filter)
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    let summaries: Vec<PropertySummary> = properties.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summaries)))
}

/*
    GET /api/properties/{slug}
*/
pub async fn get_property(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let property = find_active_property(&db, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PropertyDetails::from(property))))
}

pub fn calendar_window(query: &CalendarQuery) -> AppResult<DateRange> {
    let today = Utc::now().date_naive();
    let from = query.from.unwrap_or(today);
    let to = match query.to {
        Some(to) => to,
        None => from
            .checked_add_signed(Duration::days(DEFAULT_CALENDAR_DAYS))
            .ok_or_else(|| AppError::Validation("'from' is out of range".to_string()))?,
    };

    if to <= from {
        return Err(AppError::Validation(
            "'to' must be after 'from'".to_string(),
        ));
    }
    if (to - from).num_days() > MAX_CALENDAR_DAYS {
        return Err(AppError::Validation(format!(
            "Calendar window cannot exceed {} days",
            MAX_CALENDAR_DAYS
        )));
    }
    Ok(DateRange {
        check_in: from,
        check_out: to,
    })
}

/*
    GET /api/properties/{slug}/calendar?from=YYYY-MM-DD&to=YYYY-MM-DD
*/
pub async fn get_calendar(
    db: web::Data<Database>,
    path: web::Path<String>,
    query: web::Query<CalendarQuery>,
) -> AppResult<HttpResponse> {
    let window = calendar_window(&query)?;
    let property = find_active_property(&db, &path.into_inner()).await?;
    let property_id = property
        .id
        .ok_or_else(|| AppError::Internal("Property without _id".to_string()))?;

    let (bookings, events) = load_calendar(&db, property_id, window).await?;
    let availability = Availability {
        blocked_dates: blocked_nights(window, &bookings, &events).into_iter().collect(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(availability)))
}
