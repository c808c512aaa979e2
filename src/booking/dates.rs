use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::property::PropertyPricing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every night of the stay, check-in inclusive, check-out exclusive.
    pub fn each_night(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < check_out)
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Nights shared by both ranges, or `None` when they do not overlap.
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        let range = DateRange {
            check_in: self.check_in.max(other.check_in),
            check_out: self.check_out.min(other.check_out),
        };
        (range.check_in < range.check_out).then_some(range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("Check-in date cannot be in the past")]
    CheckInInPast,
    #[error("Check-out must be after check-in")]
    CheckOutNotAfterCheckIn,
    #[error("Please select a check-in date first")]
    CheckInNotSelected,
    #[error("Minimum stay is {0} nights")]
    BelowMinimumStay(u32),
    #[error("Maximum stay is {0} nights")]
    AboveMaximumStay(u32),
    #[error("Selected dates are not available")]
    Unavailable(NaiveDate),
}

/// Stay limits and blocked nights known for a property.
#[derive(Debug, Clone, Default)]
pub struct StayConstraints {
    pub min_nights: Option<u32>,
    pub max_nights: Option<u32>,
    pub blocked: BTreeSet<NaiveDate>,
}

impl StayConstraints {
    pub fn from_pricing(pricing: &PropertyPricing, blocked: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            min_nights: pricing.min_nights,
            max_nights: pricing.max_nights,
            blocked: blocked.into_iter().collect(),
        }
    }

    fn check(&self, range: &DateRange) -> Result<(), RejectionReason> {
        let nights = range.nights();
        if let Some(min) = self.min_nights {
            if nights < i64::from(min) {
                return Err(RejectionReason::BelowMinimumStay(min));
            }
        }
        if let Some(max) = self.max_nights {
            if nights > i64::from(max) {
                return Err(RejectionReason::AboveMaximumStay(max));
            }
        }
        if let Some(night) = range.each_night().find(|d| self.blocked.contains(d)) {
            return Err(RejectionReason::Unavailable(night));
        }
        Ok(())
    }
}

/// Validate a candidate range against `today` and the property's constraints.
pub fn select_dates(
    candidate: DateRange,
    today: NaiveDate,
    constraints: &StayConstraints,
) -> Result<DateRange, RejectionReason> {
    if candidate.check_in < today {
        return Err(RejectionReason::CheckInInPast);
    }
    if candidate.check_out <= candidate.check_in {
        return Err(RejectionReason::CheckOutNotAfterCheckIn);
    }
    constraints.check(&candidate)?;
    Ok(candidate)
}

pub fn clamp_guests(requested: u32, max_guests: u32) -> u32 {
    requested.clamp(1, max_guests.max(1))
}

/// Incremental date picker state. Never holds `check_out <= check_in`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSelection {
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
}

impl DateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(range: DateRange) -> Self {
        Self {
            check_in: Some(range.check_in),
            check_out: Some(range.check_out),
        }
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    /// Moving check-in to or past the current check-out clears check-out.
    pub fn set_check_in(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), RejectionReason> {
        if date < today {
            return Err(RejectionReason::CheckInInPast);
        }
        self.check_in = Some(date);
        if matches!(self.check_out, Some(out) if out <= date) {
            self.check_out = None;
        }
        Ok(())
    }

    /// Rejected selections leave the state untouched.
    pub fn set_check_out(&mut self, date: NaiveDate) -> Result<(), RejectionReason> {
        let check_in = self.check_in.ok_or(RejectionReason::CheckInNotSelected)?;
        if date <= check_in {
            return Err(RejectionReason::CheckOutNotAfterCheckIn);
        }
        self.check_out = Some(date);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.check_in = None;
        self.check_out = None;
    }

    pub fn range(&self) -> Option<DateRange> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(DateRange { check_in, check_out }),
            _ => None,
        }
    }

    pub fn nights(&self) -> i64 {
        self.range().map(|r| r.nights()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_nights_and_each_night() {
        let range = DateRange {
            check_in: d(2025, 6, 1),
            check_out: d(2025, 6, 4),
        };
        assert_eq!(range.nights(), 3);
        let nights: Vec<_> = range.each_night().collect();
        assert_eq!(nights, vec![d(2025, 6, 1), d(2025, 6, 2), d(2025, 6, 3)]);
    }

    #[test]
    fn test_intersection() {
        let stay = DateRange {
            check_in: d(2025, 6, 1),
            check_out: d(2025, 6, 10),
        };
        let window = DateRange {
            check_in: d(2025, 6, 8),
            check_out: d(2025, 7, 1),
        };
        assert_eq!(
            stay.intersection(&window),
            Some(DateRange {
                check_in: d(2025, 6, 8),
                check_out: d(2025, 6, 10),
            })
        );

        let next = DateRange {
            check_in: d(2025, 6, 10),
            check_out: d(2025, 6, 12),
        };
        assert_eq!(stay.intersection(&next), None);
    }

    #[test]
    fn test_select_dates_rejections() {
        let today = d(2025, 5, 20);
        let none = StayConstraints::default();

        let past = DateRange {
            check_in: d(2025, 5, 19),
            check_out: d(2025, 5, 22),
        };
        assert_eq!(select_dates(past, today, &none), Err(RejectionReason::CheckInInPast));

        let inverted = DateRange {
            check_in: d(2025, 6, 4),
            check_out: d(2025, 6, 4),
        };
        assert_eq!(
            select_dates(inverted, today, &none),
            Err(RejectionReason::CheckOutNotAfterCheckIn)
        );

        let same_day_check_in = DateRange {
            check_in: today,
            check_out: d(2025, 5, 21),
        };
        assert!(select_dates(same_day_check_in, today, &none).is_ok());
    }

    #[test]
    fn test_stay_limits_and_blocked_nights() {
        let today = d(2025, 5, 1);
        let constraints = StayConstraints {
            min_nights: Some(2),
            max_nights: Some(7),
            blocked: [d(2025, 6, 3)].into_iter().collect(),
        };

        let short = DateRange {
            check_in: d(2025, 6, 10),
            check_out: d(2025, 6, 11),
        };
        assert_eq!(
            select_dates(short, today, &constraints),
            Err(RejectionReason::BelowMinimumStay(2))
        );

        let long = DateRange {
            check_in: d(2025, 6, 10),
            check_out: d(2025, 6, 20),
        };
        assert_eq!(
            select_dates(long, today, &constraints),
            Err(RejectionReason::AboveMaximumStay(7))
        );

        let blocked = DateRange {
            check_in: d(2025, 6, 1),
            check_out: d(2025, 6, 4),
        };
        assert_eq!(
            select_dates(blocked, today, &constraints),
            Err(RejectionReason::Unavailable(d(2025, 6, 3)))
        );

        // Check-out day itself may be blocked: guests leave that morning.
        let ends_on_block = DateRange {
            check_in: d(2025, 6, 1),
            check_out: d(2025, 6, 3),
        };
        assert!(select_dates(ends_on_block, today, &constraints).is_ok());
    }

    #[test]
    fn test_check_out_not_after_check_in_is_rejected_without_mutation() {
        let today = d(2025, 5, 1);
        let mut selection = DateSelection::new();
        selection.set_check_in(d(2025, 6, 1), today).unwrap();
        selection.set_check_out(d(2025, 6, 4)).unwrap();

        let before = selection.clone();
        assert_eq!(
            selection.set_check_out(d(2025, 6, 1)),
            Err(RejectionReason::CheckOutNotAfterCheckIn)
        );
        assert_eq!(
            selection.set_check_out(d(2025, 5, 30)),
            Err(RejectionReason::CheckOutNotAfterCheckIn)
        );
        assert_eq!(selection, before);
    }

    #[test]
    fn test_moving_check_in_past_check_out_clears_it() {
        let today = d(2025, 5, 1);
        let mut selection = DateSelection::with_range(DateRange {
            check_in: d(2025, 6, 1),
            check_out: d(2025, 6, 4),
        });

        selection.set_check_in(d(2025, 6, 2), today).unwrap();
        assert_eq!(selection.check_out(), Some(d(2025, 6, 4)));

        selection.set_check_in(d(2025, 6, 4), today).unwrap();
        assert_eq!(selection.check_out(), None);
        assert_eq!(selection.range(), None);
        assert_eq!(selection.nights(), 0);
    }

    #[test]
    fn test_check_out_requires_check_in() {
        let mut selection = DateSelection::new();
        assert_eq!(
            selection.set_check_out(d(2025, 6, 4)),
            Err(RejectionReason::CheckInNotSelected)
        );
    }

    #[test]
    fn test_clamp_guests() {
        assert_eq!(clamp_guests(0, 4), 1);
        assert_eq!(clamp_guests(3, 4), 3);
        assert_eq!(clamp_guests(9, 4), 4);
        assert_eq!(clamp_guests(2, 0), 1);
    }
}
