use serde::{Deserialize, Serialize};

use crate::models::property::PropertyPricing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub nights: i64,
    pub subtotal: f64,
    pub cleaning_fee: f64,
    pub parking_total: f64,
    pub admin_fee: f64,
    pub total: f64,
}

impl PriceBreakdown {
    /// A zero breakdown means the selection cannot be submitted.
    pub fn is_payable(&self) -> bool {
        self.nights > 0 && self.total > 0.0
    }

    /// Total expressed in the currency's minor unit, for the payment provider.
    pub fn total_minor_units(&self) -> i64 {
        (self.total * 100.0).round() as i64
    }
}

pub struct PricingService;

impl PricingService {
    /// Round half up to the nearest whole currency unit
    pub fn round_currency(amount: f64) -> f64 {
        (amount + 0.5).floor()
    }

    /// Calculate admin fee as a rounded percentage of the subtotal
    pub fn calculate_admin_fee(subtotal: f64, admin_fee_percent: f64) -> f64 {
        Self::round_currency(subtotal * admin_fee_percent / 100.0)
    }

    /// Compute the full price breakdown for a stay.
    ///
    /// Non-positive night counts produce an all-zero breakdown; callers must
    /// treat that as "not submittable".
    pub fn compute_total(
        pricing: &PropertyPricing,
        nights: i64,
        include_parking: bool,
    ) -> PriceBreakdown {
        if nights <= 0 {
            return PriceBreakdown::default();
        }

        let n = nights as f64;
        let subtotal = pricing.nightly_rate * n;
        let cleaning_fee = pricing.cleaning_fee;
        let parking_total = if include_parking {
            pricing.parking_fee * n
        } else {
            0.0
        };
        let admin_fee = Self::calculate_admin_fee(subtotal, pricing.admin_fee_percent);

        PriceBreakdown {
            nights,
            subtotal,
            cleaning_fee,
            parking_total,
            admin_fee,
            total: subtotal + cleaning_fee + parking_total + admin_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing() -> PropertyPricing {
        PropertyPricing {
            nightly_rate: 2500.0,
            cleaning_fee: 500.0,
            parking_fee: 200.0,
            admin_fee_percent: 10.0,
            max_guests: 4,
            min_nights: None,
            max_nights: None,
        }
    }

    #[test]
    fn test_reference_booking_total() {
        let breakdown = PricingService::compute_total(&pricing(), 3, true);
        assert_eq!(breakdown.subtotal, 7500.0);
        assert_eq!(breakdown.parking_total, 600.0);
        assert_eq!(breakdown.admin_fee, 750.0);
        assert_eq!(breakdown.cleaning_fee, 500.0);
        assert_eq!(breakdown.total, 9350.0);
        assert_eq!(breakdown.total_minor_units(), 935_000);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        for nights in 1..=30 {
            for include_parking in [false, true] {
                let b = PricingService::compute_total(&pricing(), nights, include_parking);
                assert_eq!(b.total, b.subtotal + b.cleaning_fee + b.parking_total + b.admin_fee);
            }
        }
    }

    #[test]
    fn test_parking_increases_total_only_with_fee() {
        let with_fee = pricing();
        let without = PricingService::compute_total(&with_fee, 2, false);
        let with = PricingService::compute_total(&with_fee, 2, true);
        assert!(with.total > without.total);

        let free_parking = PropertyPricing {
            parking_fee: 0.0,
            ..pricing()
        };
        let a = PricingService::compute_total(&free_parking, 2, false);
        let b = PricingService::compute_total(&free_parking, 2, true);
        assert_eq!(a.total, b.total);
    }

    #[test]
    fn test_non_positive_nights_yield_zero() {
        for nights in [0, -1, -30] {
            let b = PricingService::compute_total(&pricing(), nights, true);
            assert_eq!(b, PriceBreakdown::default());
            assert!(!b.is_payable());
        }
    }

    #[test]
    fn test_admin_fee_rounds_half_up() {
        // 1234 * 12.5% = 154.25
        assert_eq!(PricingService::calculate_admin_fee(1234.0, 12.5), 154.0);
        // 1500 * 4.5% = 67.5
        assert_eq!(PricingService::calculate_admin_fee(1500.0, 4.5), 68.0);
        assert_eq!(PricingService::calculate_admin_fee(1000.0, 0.0), 0.0);
    }
}
