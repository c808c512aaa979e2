use chrono::NaiveDate;
use log::debug;
use uuid::Uuid;

use super::dates::{clamp_guests, select_dates, DateSelection, RejectionReason, StayConstraints};
use super::error::BookingError;
use super::validation::{validate, FieldErrorMap, GuestInfo};
use crate::models::bookings::{BookingRequest, WEBSITE_SOURCE};
use crate::models::property::{PropertyDetails, PropertyPricing};
use crate::services::pricing_service::{PriceBreakdown, PricingService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Confirm,
    GuestInfo,
    Requests,
    Payment,
    Submitting,
    Redirected,
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Confirm => "confirm",
            WizardStep::GuestInfo => "guest info",
            WizardStep::Requests => "special requests",
            WizardStep::Payment => "payment",
            WizardStep::Submitting => "submitting",
            WizardStep::Redirected => "redirected",
        }
    }

    /// 1-based position for the four user-facing steps.
    pub fn number(&self) -> Option<u8> {
        match self {
            WizardStep::Confirm => Some(1),
            WizardStep::GuestInfo => Some(2),
            WizardStep::Requests => Some(3),
            WizardStep::Payment | WizardStep::Submitting => Some(4),
            WizardStep::Redirected => None,
        }
    }
}

/// Everything the guest has selected so far. Lives for one booking session.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub property_id: String,
    pub property_name: String,
    pricing: PropertyPricing,
    constraints: StayConstraints,
    pub dates: DateSelection,
    guest_count: u32,
    pub include_parking: bool,
    pub guest: GuestInfo,
    pub special_requests: Option<String>,
    idempotency_key: Uuid,
}

impl BookingDraft {
    pub fn new(property: &PropertyDetails, blocked: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            property_id: property.id.clone(),
            property_name: property.name.clone(),
            pricing: property.pricing,
            constraints: StayConstraints::from_pricing(&property.pricing, blocked),
            dates: DateSelection::new(),
            guest_count: 1,
            include_parking: false,
            guest: GuestInfo::default(),
            special_requests: None,
            idempotency_key: Uuid::new_v4(),
        }
    }

    pub fn pricing(&self) -> &PropertyPricing {
        &self.pricing
    }

    pub fn constraints(&self) -> &StayConstraints {
        &self.constraints
    }

    pub fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub fn set_guest_count(&mut self, requested: u32) -> u32 {
        self.guest_count = clamp_guests(requested, self.pricing.max_guests);
        self.guest_count
    }

    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    pub fn price_breakdown(&self) -> PriceBreakdown {
        PricingService::compute_total(&self.pricing, self.dates.nights(), self.include_parking)
    }

    fn special_requests(&self) -> Option<String> {
        self.special_requests
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn to_request(&self) -> Option<BookingRequest> {
        let range = self.dates.range()?;
        Some(BookingRequest {
            property_id: self.property_id.clone(),
            check_in: range.check_in,
            check_out: range.check_out,
            num_guests: self.guest_count,
            include_parking: self.include_parking,
            guest: self.guest.clone(),
            special_requests: self.special_requests(),
            source: WEBSITE_SOURCE.to_string(),
            idempotency_key: Some(self.idempotency_key.to_string()),
        })
    }
}

/// Four-step booking flow: confirm dates, guest info, requests, payment.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    pub draft: BookingDraft,
    step: WizardStep,
    field_errors: FieldErrorMap,
    error_banner: Option<String>,
    checkout_url: Option<String>,
}

impl BookingWizard {
    pub fn new(draft: BookingDraft) -> Self {
        Self {
            draft,
            step: WizardStep::Confirm,
            field_errors: FieldErrorMap::new(),
            error_banner: None,
            checkout_url: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn field_errors(&self) -> &FieldErrorMap {
        &self.field_errors
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref()
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.step == WizardStep::Payment
    }

    fn invalid(&self, action: &'static str) -> BookingError {
        BookingError::InvalidStep {
            action,
            step: self.step.name(),
        }
    }

    /// Move forward one step if the current step's guard passes.
    pub fn next(&mut self, today: NaiveDate) -> Result<WizardStep, BookingError> {
        let next = match self.step {
            WizardStep::Confirm => {
                let range = self
                    .draft
                    .dates
                    .range()
                    .ok_or(BookingError::InvalidDates(RejectionReason::CheckOutNotAfterCheckIn))?;
                select_dates(range, today, &self.draft.constraints)
                    .map_err(BookingError::InvalidDates)?;
                WizardStep::GuestInfo
            }
            WizardStep::GuestInfo => {
                let report = validate(&self.draft.guest);
                self.field_errors = report.errors;
                if !report.valid {
                    return Err(BookingError::Validation(self.field_errors.clone()));
                }
                WizardStep::Requests
            }
            WizardStep::Requests => WizardStep::Payment,
            _ => return Err(self.invalid("continue")),
        };
        debug!("Booking wizard: {} -> {}", self.step.name(), next.name());
        self.step = next;
        Ok(next)
    }

    /// Go back one step. The draft is left as is.
    pub fn back(&mut self) -> Result<WizardStep, BookingError> {
        let previous = match self.step {
            WizardStep::GuestInfo => WizardStep::Confirm,
            WizardStep::Requests => WizardStep::GuestInfo,
            WizardStep::Payment => WizardStep::Requests,
            _ => return Err(self.invalid("go back")),
        };
        self.error_banner = None;
        self.step = previous;
        Ok(previous)
    }

    /// Enter `Submitting` and hand out the request body for phase one.
    pub fn begin_submission(&mut self) -> Result<BookingRequest, BookingError> {
        match self.step {
            WizardStep::Payment => {}
            WizardStep::Submitting => return Err(BookingError::AlreadySubmitting),
            _ => return Err(self.invalid("submit")),
        }
        if !self.draft.price_breakdown().is_payable() {
            return Err(BookingError::InvalidDates(
                RejectionReason::CheckOutNotAfterCheckIn,
            ));
        }
        let request = self
            .draft
            .to_request()
            .ok_or_else(|| self.invalid("submit"))?;
        self.error_banner = None;
        self.step = WizardStep::Submitting;
        Ok(request)
    }

    /// Back to the payment step with the error shown; the guest may resubmit.
    pub fn submission_failed(&mut self, err: &BookingError) {
        self.error_banner = Some(err.user_message());
        self.step = WizardStep::Payment;
    }

    pub fn redirected(&mut self, checkout_url: String) {
        self.checkout_url = Some(checkout_url);
        self.step = WizardStep::Redirected;
    }
}
