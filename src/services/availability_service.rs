use std::collections::BTreeSet;

use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use crate::booking::dates::DateRange;
use crate::db::mongo::Database;
use crate::models::bookings::{Booking, BookingStatus};
use crate::models::calendar::CalendarEvent;

/// Nights within `window` that are held by bookings or blocking calendar events.
pub fn blocked_nights<'a>(
    window: DateRange,
    bookings: impl IntoIterator<Item = &'a Booking>,
    events: impl IntoIterator<Item = &'a CalendarEvent>,
) -> BTreeSet<NaiveDate> {
    let mut blocked = BTreeSet::new();

    for booking in bookings {
        if !booking.status.occupies_calendar() {
            continue;
        }
        let stay = DateRange {
            check_in: booking.check_in,
            check_out: booking.check_out,
        };
        if let Some(held) = stay.intersection(&window) {
            blocked.extend(held.each_night());
        }
    }

    for event in events {
        if event.event_type.blocks_night()
            && event.event_date >= window.check_in
            && event.event_date < window.check_out
        {
            blocked.insert(event.event_date);
        }
    }

    blocked
}

/// First night of `range` that is already taken, if any.
pub fn first_conflict<'a>(
    range: DateRange,
    bookings: impl IntoIterator<Item = &'a Booking>,
    events: impl IntoIterator<Item = &'a CalendarEvent>,
) -> Option<NaiveDate> {
    blocked_nights(range, bookings, events).into_iter().next()
}

fn occupying_statuses() -> Vec<&'static str> {
    [BookingStatus::Pending, BookingStatus::Confirmed]
        .iter()
        .map(|s| s.as_str())
        .collect()
}

/// Bookings and calendar events for a property that touch `window`.
pub async fn load_calendar(
    db: &Database,
    property_id: ObjectId,
    window: DateRange,
) -> Result<(Vec<Booking>, Vec<CalendarEvent>), mongodb::error::Error> {
    // Dates are stored as ISO strings, so lexical comparison is date order.
    let booking_filter = doc! {
        "property_id": property_id,
        "status": { "$in": occupying_statuses() },
        "check_in": { "$lt": window.check_out.to_string() },
        "check_out": { "$gt": window.check_in.to_string() },
    };
    let bookings: Vec<Booking> = db.bookings().find(booking_filter).await?.try_collect().await?;

    let event_filter = doc! {
        "property_id": property_id,
        "event_date": {
            "$gte": window.check_in.to_string(),
            "$lt": window.check_out.to_string(),
        },
    };
    let events: Vec<CalendarEvent> = db
        .calendar_events()
        .find(event_filter)
        .await?
        .try_collect()
        .await?;

    Ok((bookings, events))
}
