use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};

use crate::db::mongo::Database;
use crate::error::{AppError, AppResult};
use crate::models::api::ApiResponse;
use crate::models::bookings::{Booking, BookingStatus};
use crate::models::calendar::CalendarQuery;
use crate::services::revenue_service::RevenueService;

fn revenue_filter(query: &CalendarQuery) -> AppResult<Document> {
    let mut filter = doc! {
        "status": { "$in": [BookingStatus::Confirmed.as_str(), BookingStatus::Completed.as_str()] },
    };
    let mut check_in = doc! {};
    if let Some(from) = query.from {
        check_in.insert("$gte", from.to_string());
    }
    if let Some(to) = query.to {
        check_in.insert("$lte", to.to_string());
    }
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if to < from {
            return Err(AppError::Validation("'to' must not be before 'from'".to_string()));
        }
    }
    if !check_in.is_empty() {
        filter.insert("check_in", check_in);
    }
    Ok(filter)
}

/*
    GET /api/admin/revenue?from=YYYY-MM-DD&to=YYYY-MM-DD
*/
pub async fn revenue_report(
    db: web::Data<Database>,
    query: web::Query<CalendarQuery>,
) -> AppResult<HttpResponse> {
    let bookings: Vec<Booking> = db
        .bookings()
        .find(revenue_filter(&query)?)
        .await?
        .try_collect()
        .await?;

    let report = RevenueService::summarize(&bookings, query.from, query.to);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}
