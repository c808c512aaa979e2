use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use mongodb::bson::{doc, oid::ObjectId};

use crate::booking::dates::{select_dates, DateRange, StayConstraints};
use crate::booking::validation::validate;
use crate::db::mongo::Database;
use crate::error::{AppError, AppResult};
use crate::models::api::ApiResponse;
use crate::models::bookings::{
    Booking, BookingCreated, BookingRequest, BookingStatus, PaymentStatus, WEBSITE_SOURCE,
};
use crate::services::availability_service::{first_conflict, load_calendar};
use crate::services::pricing_service::PricingService;

const MAX_SPECIAL_REQUESTS_LEN: usize = 2000;

/// Longest stay accepted when the property sets no maximum of its own.
pub const MAX_STAY_NIGHTS: u32 = 365;

/// Checks that need no database access. Returns the parsed property id and stay.
pub fn validate_request(
    input: &BookingRequest,
    today: NaiveDate,
) -> AppResult<(ObjectId, DateRange)> {
    let report = validate(&input.guest);
    if !report.valid {
        return Err(AppError::GuestInfo(report.errors));
    }

    let range = select_dates(
        DateRange {
            check_in: input.check_in,
            check_out: input.check_out,
        },
        today,
        &StayConstraints {
            max_nights: Some(MAX_STAY_NIGHTS),
            ..StayConstraints::default()
        },
    )
    .map_err(|reason| AppError::Validation(reason.to_string()))?;

    if input.num_guests == 0 {
        return Err(AppError::Validation("At least one guest is required".to_string()));
    }

    if input
        .special_requests
        .as_ref()
        .is_some_and(|s| s.len() > MAX_SPECIAL_REQUESTS_LEN)
    {
        return Err(AppError::Validation(format!(
            "Special requests cannot exceed {} characters",
            MAX_SPECIAL_REQUESTS_LEN
        )));
    }

    let property_id = ObjectId::parse_str(&input.property_id)
        .map_err(|_| AppError::Validation("Invalid property ID".to_string()))?;

    Ok((property_id, range))
}

fn idempotency_key(req: &HttpRequest, input: &BookingRequest) -> Option<String> {
    input
        .idempotency_key
        .clone()
        .or_else(|| {
            req.headers()
                .get("Idempotency-Key")
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        })
        .filter(|key| !key.trim().is_empty())
}

/*
    POST /api/bookings
*/
pub async fn create_booking(
    req: HttpRequest,
    db: web::Data<Database>,
    input: web::Json<BookingRequest>,
) -> AppResult<HttpResponse> {
    let input = input.into_inner();
    let today = Utc::now().date_naive();
    let (property_id, range) = validate_request(&input, today)?;
    let key = idempotency_key(&req, &input);

    let bookings = db.bookings();

    if let Some(key) = &key {
        if let Some(existing) = bookings.find_one(doc! { "idempotency_key": key }).await? {
            info!("Replaying booking for idempotency key {}", key);
            return Ok(HttpResponse::Ok().json(ApiResponse::ok(BookingCreated::from_booking(&existing))));
        }
    }

    let property = db
        .properties()
        .find_one(doc! { "_id": property_id, "active": true })
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;
    let pricing = property.pricing();

    if input.num_guests > pricing.max_guests {
        return Err(AppError::Validation(format!(
            "This property allows at most {} guests",
            pricing.max_guests
        )));
    }
    let mut constraints = StayConstraints::from_pricing(&pricing, []);
    constraints.max_nights.get_or_insert(MAX_STAY_NIGHTS);
    select_dates(range, today, &constraints)
        .map_err(|reason| AppError::Validation(reason.to_string()))?;

    let (existing, events) = load_calendar(&db, property_id, range).await?;
    if let Some(night) = first_conflict(range, &existing, &events) {
        warn!("Booking rejected for {}: {} already taken", property.slug, night);
        return Err(AppError::Conflict("Dates unavailable".to_string()));
    }

    let now = Utc::now();
    let source = if input.source.trim().is_empty() {
        WEBSITE_SOURCE.to_string()
    } else {
        input.source
    };
    let mut booking = Booking {
        id: None,
        property_id,
        property_name: property.name.clone(),
        check_in: range.check_in,
        check_out: range.check_out,
        num_guests: input.num_guests,
        include_parking: input.include_parking,
        guest: input.guest,
        special_requests: input
            .special_requests
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        source,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        pricing: PricingService::compute_total(&pricing, range.nights(), input.include_parking),
        idempotency_key: key,
        checkout_session_id: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let result = match bookings.insert_one(&booking).await {
        Ok(result) => result,
        Err(err) => {
            // A concurrent retry with the same key may have won the unique index.
            if let Some(key) = &booking.idempotency_key {
                if let Some(existing) = bookings.find_one(doc! { "idempotency_key": key }).await? {
                    return Ok(HttpResponse::Ok().json(ApiResponse::ok(BookingCreated::from_booking(&existing))));
                }
            }
            return Err(err.into());
        }
    };
    booking.id = result.inserted_id.as_object_id();
    info!(
        "Booking {:?} created for {} ({} to {})",
        booking.id, property.slug, booking.check_in, booking.check_out
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok(BookingCreated::from_booking(&booking))))
}
