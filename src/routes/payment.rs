use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{info, warn};
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::json;
use stripe::{EventObject, EventType, Webhook};

use crate::config::Config;
use crate::db::mongo::Database;
use crate::error::{AppError, AppResult};
use crate::models::api::ApiResponse;
use crate::models::bookings::{
    Booking, BookingStatus, CheckoutCreated, CheckoutRequest, PaymentStatus,
};
use crate::services::payment::interface::{
    CheckoutLineItem, CheckoutOperations, CheckoutSessionInput, PaymentError,
};
use crate::services::stripe::provider::StripeProvider;

pub fn checkout_input(booking: &Booking, booking_id: &str, site_url: &str) -> CheckoutSessionInput {
    CheckoutSessionInput {
        booking_id: booking_id.to_string(),
        customer_email: Some(booking.guest.email.clone()),
        line_item: CheckoutLineItem {
            name: format!("{} ({} nights)", booking.property_name, booking.pricing.nights),
            description: Some(format!(
                "Check-in {} / Check-out {}, {} guest(s)",
                booking.check_in, booking.check_out, booking.num_guests
            )),
            amount: booking.pricing.total_minor_units(),
        },
        success_url: format!(
            "{}/booking/success?booking_id={}&session_id={{CHECKOUT_SESSION_ID}}",
            site_url, booking_id
        ),
        cancel_url: format!("{}/booking/cancelled?booking_id={}", site_url, booking_id),
    }
}

/*
    POST /api/payments/create-checkout
*/
pub async fn create_checkout(
    db: web::Data<Database>,
    config: web::Data<Config>,
    provider: Option<web::Data<StripeProvider>>,
    input: web::Json<CheckoutRequest>,
) -> AppResult<HttpResponse> {
    let booking_id = input.into_inner().booking_id;
    let object_id = ObjectId::parse_str(&booking_id)
        .map_err(|_| AppError::Validation("Invalid booking ID".to_string()))?;

    let provider =
        provider.ok_or_else(|| AppError::Payment(PaymentError::NotConfigured.to_string()))?;

    let bookings = db.bookings();
    let booking = bookings
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.status != BookingStatus::Pending || booking.payment_status != PaymentStatus::Unpaid {
        return Err(AppError::Conflict(
            "Booking is no longer awaiting payment".to_string(),
        ));
    }

    let session = provider
        .create_checkout_session(checkout_input(&booking, &booking_id, &config.site_url))
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    bookings
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": {
                "checkout_session_id": &session.session_id,
                "updated_at": Utc::now().to_rfc3339(),
            }},
        )
        .await?;
    info!("Checkout session {} created for booking {}", session.session_id, booking_id);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CheckoutCreated {
        checkout_url: session.checkout_url,
        session_id: Some(session.session_id),
    })))
}

async fn settle_booking(
    db: &Database,
    booking_id: &str,
    status: BookingStatus,
    payment_status: Option<PaymentStatus>,
) -> AppResult<()> {
    let object_id = ObjectId::parse_str(booking_id)
        .map_err(|_| AppError::Validation("Invalid booking ID".to_string()))?;

    let mut set = doc! {
        "status": status.as_str(),
        "updated_at": Utc::now().to_rfc3339(),
    };
    if let Some(payment_status) = payment_status {
        let payment_status = mongodb::bson::to_bson(&payment_status)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        set.insert("payment_status", payment_status);
    }

    let result = db
        .bookings()
        .update_one(
            doc! { "_id": object_id, "status": BookingStatus::Pending.as_str() },
            doc! { "$set": set },
        )
        .await?;
    if result.matched_count == 0 {
        warn!("Booking {} was not pending; left as is", booking_id);
    }
    Ok(())
}

/*
    POST /api/payments/webhook
*/
pub async fn handle_stripe_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    db: web::Data<Database>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let signature = req
        .headers()
        .get("stripe-signature")
        .and_then(|sig| sig.to_str().ok())
        .ok_or_else(|| AppError::Validation("Missing stripe-signature header".to_string()))?;

    let secret = config
        .stripe_webhook_secret
        .as_deref()
        .ok_or_else(|| AppError::Internal("STRIPE_WEBHOOK_SECRET not configured".to_string()))?;

    let payload_str = std::str::from_utf8(&payload)
        .map_err(|_| AppError::Validation("Invalid payload encoding".to_string()))?;

    let event = Webhook::construct_event(payload_str, signature, secret).map_err(|e| {
        warn!("Webhook error: {:?}", e);
        AppError::Validation(format!("Webhook error: {}", e))
    })?;

    match (event.type_, event.data.object) {
        (EventType::CheckoutSessionCompleted, EventObject::CheckoutSession(session)) => {
            if let Some(booking_id) = session.client_reference_id.as_deref() {
                info!("Checkout completed for booking {}", booking_id);
                settle_booking(&db, booking_id, BookingStatus::Confirmed, Some(PaymentStatus::Paid))
                    .await?;
            }
        }
        (EventType::CheckoutSessionExpired, EventObject::CheckoutSession(session)) => {
            if let Some(booking_id) = session.client_reference_id.as_deref() {
                info!("Checkout expired for booking {}", booking_id);
                settle_booking(&db, booking_id, BookingStatus::Cancelled, None).await?;
            }
        }
        (other, _) => {
            info!("Unhandled event type: {:?}", other);
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}
