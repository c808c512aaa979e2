use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::bookings::Booking;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub bookings: u32,
    pub nights: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub bookings: u32,
    pub nights: i64,
    pub revenue: f64,
    pub average_nightly_rate: f64,
    pub months: Vec<MonthlyRevenue>,
}

pub struct RevenueService;

impl RevenueService {
    /// Summarise confirmed and completed bookings by check-in month.
    /// `from` and `to` bound the check-in date, both inclusive.
    pub fn summarize<'a>(
        bookings: impl IntoIterator<Item = &'a Booking>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RevenueReport {
        let mut months: BTreeMap<(i32, u32), MonthlyRevenue> = BTreeMap::new();
        let mut report = RevenueReport {
            from,
            to,
            ..Default::default()
        };

        let in_window = |date: NaiveDate| {
            from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
        };

        for booking in bookings {
            if !booking.status.earns_revenue() || !in_window(booking.check_in) {
                continue;
            }
            let key = (booking.check_in.year(), booking.check_in.month());
            let entry = months.entry(key).or_insert_with(|| MonthlyRevenue {
                month: format!("{:04}-{:02}", key.0, key.1),
                ..Default::default()
            });
            entry.bookings += 1;
            entry.nights += booking.pricing.nights;
            entry.revenue += booking.pricing.total;

            report.bookings += 1;
            report.nights += booking.pricing.nights;
            report.revenue += booking.pricing.total;
        }

        if report.nights > 0 {
            report.average_nightly_rate = report.revenue / report.nights as f64;
        }
        report.months = months.into_values().collect();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::validation::GuestInfo;
    use crate::models::bookings::{BookingStatus, PaymentStatus};
    use crate::services::pricing_service::PriceBreakdown;
    use mongodb::bson::oid::ObjectId;

    fn booking(check_in: (i32, u32, u32), nights: i64, total: f64, status: BookingStatus) -> Booking {
        let check_in = NaiveDate::from_ymd_opt(check_in.0, check_in.1, check_in.2).unwrap();
        Booking {
            id: Some(ObjectId::new()),
            property_id: ObjectId::new(),
            property_name: "Azure Loft".to_string(),
            check_in,
            check_out: check_in + chrono::Duration::days(nights),
            num_guests: 2,
            include_parking: false,
            guest: GuestInfo::default(),
            special_requests: None,
            source: "website".to_string(),
            status,
            payment_status: PaymentStatus::Paid,
            pricing: PriceBreakdown {
                nights,
                total,
                ..Default::default()
            },
            idempotency_key: None,
            checkout_session_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_summarize_groups_by_month() {
        let bookings = vec![
            booking((2025, 6, 1), 3, 9350.0, BookingStatus::Confirmed),
            booking((2025, 6, 20), 2, 6000.0, BookingStatus::Completed),
            booking((2025, 7, 2), 4, 12000.0, BookingStatus::Confirmed),
            booking((2025, 7, 9), 1, 3000.0, BookingStatus::Pending),
            booking((2025, 7, 15), 2, 5000.0, BookingStatus::Cancelled),
        ];

        let report = RevenueService::summarize(&bookings, None, None);
        assert_eq!(report.bookings, 3);
        assert_eq!(report.nights, 9);
        assert_eq!(report.revenue, 27350.0);
        assert_eq!(report.months.len(), 2);
        assert_eq!(report.months[0].month, "2025-06");
        assert_eq!(report.months[0].revenue, 15350.0);
        assert_eq!(report.months[1].month, "2025-07");
        assert_eq!(report.months[1].bookings, 1);
    }

    #[test]
    fn test_summarize_window_is_inclusive() {
        let bookings = vec![
            booking((2025, 6, 1), 3, 9000.0, BookingStatus::Confirmed),
            booking((2025, 6, 30), 1, 3000.0, BookingStatus::Confirmed),
            booking((2025, 7, 1), 1, 3000.0, BookingStatus::Confirmed),
        ];
        let from = NaiveDate::from_ymd_opt(2025, 6, 1);
        let to = NaiveDate::from_ymd_opt(2025, 6, 30);

        let report = RevenueService::summarize(&bookings, from, to);
        assert_eq!(report.bookings, 2);
        assert_eq!(report.revenue, 12000.0);
        assert_eq!(report.average_nightly_rate, 3000.0);
    }

    #[test]
    fn test_empty_report() {
        let report = RevenueService::summarize(&Vec::<Booking>::new(), None, None);
        assert_eq!(report.bookings, 0);
        assert_eq!(report.average_nightly_rate, 0.0);
        assert!(report.months.is_empty());
    }
}
