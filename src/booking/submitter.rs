use chrono::{Duration, NaiveDate};
use log::{info, warn};

use super::error::BookingError;
use super::wizard::{BookingDraft, BookingWizard};
use crate::models::bookings::{BookingCreated, BookingRequest, CheckoutCreated};
use crate::models::calendar::Availability;
use crate::models::property::PropertyDetails;

/// How far ahead blocked nights are fetched when a booking session opens.
pub const AVAILABILITY_WINDOW_DAYS: i64 = 365;

/// Remote collaborators the booking flow talks to.
pub trait BookingGateway {
    async fn fetch_property(&self, slug: &str) -> Result<PropertyDetails, BookingError>;
    async fn fetch_availability(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Availability, BookingError>;
    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingCreated, BookingError>;
    async fn create_checkout(&self, booking_id: &str) -> Result<CheckoutCreated, BookingError>;
}

/// Performs the full-page navigation to the hosted payment page.
pub trait Navigator {
    fn redirect(&self, url: &str);
}

/// Load the property and its calendar, then open a fresh wizard.
pub async fn open_booking<G: BookingGateway>(
    gateway: &G,
    slug: &str,
    today: NaiveDate,
) -> Result<BookingWizard, BookingError> {
    let property = gateway.fetch_property(slug).await?;
    let until = today
        .checked_add_signed(Duration::days(AVAILABILITY_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);
    let availability = gateway.fetch_availability(slug, today, until).await?;
    Ok(BookingWizard::new(BookingDraft::new(
        &property,
        availability.blocked_dates,
    )))
}

pub struct BookingSubmitter<G, N> {
    gateway: G,
    navigator: N,
}

impl<G: BookingGateway, N: Navigator> BookingSubmitter<G, N> {
    pub fn new(gateway: G, navigator: N) -> Self {
        Self { gateway, navigator }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Create the booking, then its checkout session, then redirect.
    ///
    /// Any failure puts the wizard back on the payment step with the error
    /// shown, and the same draft can be submitted again.
    pub async fn submit(&self, wizard: &mut BookingWizard) -> Result<String, BookingError> {
        let request = wizard.begin_submission()?;

        match self.run(&request).await {
            Ok(checkout_url) => {
                info!("Redirecting guest to checkout for {}", request.property_id);
                self.navigator.redirect(&checkout_url);
                wizard.redirected(checkout_url.clone());
                Ok(checkout_url)
            }
            Err(err) => {
                warn!("Booking submission failed: {}", err);
                wizard.submission_failed(&err);
                Err(err)
            }
        }
    }

    async fn run(&self, request: &BookingRequest) -> Result<String, BookingError> {
        let booking = self
            .gateway
            .create_booking(request)
            .await
            .map_err(retryable)?;
        info!("Booking {} created, requesting checkout session", booking.id);

        let checkout = self
            .gateway
            .create_checkout(&booking.id)
            .await
            .map_err(retryable)?;
        checkout
            .checkout_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| BookingError::Submission("No checkout URL returned".to_string()))
    }
}

/// A 404 once the wizard is open is reported like any other rejected submission.
fn retryable(err: BookingError) -> BookingError {
    match err {
        BookingError::NotFound(msg) => BookingError::Submission(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::dates::{DateRange, DateSelection};
    use crate::booking::validation::GuestInfo;
    use crate::booking::wizard::WizardStep;
    use crate::models::bookings::BookingStatus;
    use crate::models::property::PropertyPricing;
    use crate::services::pricing_service::PriceBreakdown;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn property() -> PropertyDetails {
        PropertyDetails {
            id: "665f1c2e8a1b2c3d4e5f6a7b".to_string(),
            slug: "azure-loft".to_string(),
            name: "Azure Loft".to_string(),
            location: None,
            description: None,
            amenities: vec![],
            featured: false,
            pricing: PropertyPricing {
                nightly_rate: 2500.0,
                cleaning_fee: 500.0,
                parking_fee: 200.0,
                admin_fee_percent: 10.0,
                max_guests: 4,
                min_nights: None,
                max_nights: None,
            },
        }
    }

    #[derive(Default)]
    struct ScriptedGateway {
        bookings: RefCell<VecDeque<Result<BookingCreated, BookingError>>>,
        checkouts: RefCell<VecDeque<Result<CheckoutCreated, BookingError>>>,
        seen_requests: RefCell<Vec<BookingRequest>>,
        seen_checkouts: RefCell<Vec<String>>,
    }

    impl ScriptedGateway {
        fn created(id: &str) -> BookingCreated {
            BookingCreated {
                id: id.to_string(),
                status: BookingStatus::Pending,
                check_in: d(2025, 6, 1),
                check_out: d(2025, 6, 4),
                nights: 3,
                pricing: PriceBreakdown::default(),
            }
        }
    }

    impl BookingGateway for ScriptedGateway {
        async fn fetch_property(&self, slug: &str) -> Result<PropertyDetails, BookingError> {
            if slug == "azure-loft" {
                Ok(property())
            } else {
                Err(BookingError::NotFound("Property not found".to_string()))
            }
        }

        async fn fetch_availability(
            &self,
            _slug: &str,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Availability, BookingError> {
            Ok(Availability {
                blocked_dates: vec![d(2025, 7, 1)],
            })
        }

        async fn create_booking(
            &self,
            request: &BookingRequest,
        ) -> Result<BookingCreated, BookingError> {
            self.seen_requests.borrow_mut().push(request.clone());
            self.bookings
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(BookingError::Network("unscripted".to_string())))
        }

        async fn create_checkout(&self, booking_id: &str) -> Result<CheckoutCreated, BookingError> {
            self.seen_checkouts.borrow_mut().push(booking_id.to_string());
            self.checkouts
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(BookingError::Network("unscripted".to_string())))
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: RefCell<Vec<String>>,
    }

    impl Navigator for &RecordingNavigator {
        fn redirect(&self, url: &str) {
            self.visited.borrow_mut().push(url.to_string());
        }
    }

    fn wizard_at_payment() -> BookingWizard {
        let today = d(2025, 5, 1);
        let mut wizard = BookingWizard::new(BookingDraft::new(&property(), []));
        wizard.draft.dates = DateSelection::with_range(DateRange {
            check_in: d(2025, 6, 1),
            check_out: d(2025, 6, 4),
        });
        wizard.draft.guest = GuestInfo {
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            email: "maria@example.com".to_string(),
            phone: "0917 555 0101".to_string(),
        };
        wizard.next(today).unwrap();
        wizard.next(today).unwrap();
        wizard.next(today).unwrap();
        assert_eq!(wizard.step(), WizardStep::Payment);
        wizard
    }

    #[test]
    fn test_successful_submission_redirects_once() {
        let gateway = ScriptedGateway::default();
        gateway
            .bookings
            .borrow_mut()
            .push_back(Ok(ScriptedGateway::created("bk_123")));
        gateway.checkouts.borrow_mut().push_back(Ok(CheckoutCreated {
            checkout_url: Some("https://pay.example/bk_123".to_string()),
            session_id: None,
        }));
        let navigator = RecordingNavigator::default();
        let submitter = BookingSubmitter::new(gateway, &navigator);
        let mut wizard = wizard_at_payment();

        let url = tokio_test::block_on(submitter.submit(&mut wizard)).unwrap();

        assert_eq!(url, "https://pay.example/bk_123");
        assert_eq!(*navigator.visited.borrow(), vec!["https://pay.example/bk_123"]);
        assert_eq!(wizard.step(), WizardStep::Redirected);
        assert_eq!(*submitter.gateway().seen_checkouts.borrow(), vec!["bk_123"]);
    }

    #[test]
    fn test_booking_rejection_returns_to_payment() {
        let gateway = ScriptedGateway::default();
        gateway
            .bookings
            .borrow_mut()
            .push_back(Err(BookingError::Submission("Dates unavailable".to_string())));
        let navigator = RecordingNavigator::default();
        let submitter = BookingSubmitter::new(gateway, &navigator);
        let mut wizard = wizard_at_payment();

        let err = tokio_test::block_on(submitter.submit(&mut wizard)).unwrap_err();

        assert_eq!(err, BookingError::Submission("Dates unavailable".to_string()));
        assert_eq!(wizard.step(), WizardStep::Payment);
        assert_eq!(wizard.error_banner(), Some("Dates unavailable"));
        assert!(wizard.is_submit_enabled());
        assert!(navigator.visited.borrow().is_empty());
        assert!(submitter.gateway().seen_checkouts.borrow().is_empty());
    }

    #[test]
    fn test_missing_checkout_url_is_retryable_with_same_key() {
        let gateway = ScriptedGateway::default();
        {
            let mut bookings = gateway.bookings.borrow_mut();
            bookings.push_back(Ok(ScriptedGateway::created("bk_9")));
            bookings.push_back(Ok(ScriptedGateway::created("bk_9")));
        }
        {
            let mut checkouts = gateway.checkouts.borrow_mut();
            checkouts.push_back(Ok(CheckoutCreated {
                checkout_url: None,
                session_id: None,
            }));
            checkouts.push_back(Ok(CheckoutCreated {
                checkout_url: Some("https://pay.example/bk_9".to_string()),
                session_id: Some("cs_test_1".to_string()),
            }));
        }
        let navigator = RecordingNavigator::default();
        let submitter = BookingSubmitter::new(gateway, &navigator);
        let mut wizard = wizard_at_payment();

        let first = tokio_test::block_on(submitter.submit(&mut wizard));
        assert!(matches!(first, Err(BookingError::Submission(_))));
        assert_eq!(wizard.step(), WizardStep::Payment);
        assert!(navigator.visited.borrow().is_empty());

        tokio_test::block_on(submitter.submit(&mut wizard)).unwrap();
        assert_eq!(navigator.visited.borrow().len(), 1);

        let requests = submitter.gateway().seen_requests.borrow();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].idempotency_key.is_some());
        assert_eq!(requests[0].idempotency_key, requests[1].idempotency_key);
    }

    #[test]
    fn test_missing_booking_at_checkout_stays_on_payment() {
        let gateway = ScriptedGateway::default();
        gateway
            .bookings
            .borrow_mut()
            .push_back(Ok(ScriptedGateway::created("bk_1")));
        gateway
            .checkouts
            .borrow_mut()
            .push_back(Err(BookingError::NotFound("Booking not found".to_string())));
        let navigator = RecordingNavigator::default();
        let submitter = BookingSubmitter::new(gateway, &navigator);
        let mut wizard = wizard_at_payment();

        let err = tokio_test::block_on(submitter.submit(&mut wizard)).unwrap_err();

        assert_eq!(err, BookingError::Submission("Booking not found".to_string()));
        assert!(err.is_retryable());
        assert_eq!(wizard.step(), WizardStep::Payment);
        assert!(wizard.is_submit_enabled());
        assert_eq!(wizard.error_banner(), Some("Booking not found"));
        assert!(navigator.visited.borrow().is_empty());
    }

    #[test]
    fn test_missing_property_at_booking_stays_on_payment() {
        let gateway = ScriptedGateway::default();
        gateway
            .bookings
            .borrow_mut()
            .push_back(Err(BookingError::NotFound("Property not found".to_string())));
        let navigator = RecordingNavigator::default();
        let submitter = BookingSubmitter::new(gateway, &navigator);
        let mut wizard = wizard_at_payment();

        assert!(tokio_test::block_on(submitter.submit(&mut wizard)).is_err());
        assert_eq!(wizard.step(), WizardStep::Payment);
        assert!(wizard.is_submit_enabled());
        assert_eq!(wizard.error_banner(), Some("Property not found"));
        assert!(submitter.gateway().seen_checkouts.borrow().is_empty());
    }

    #[test]
    fn test_open_booking_loads_property_and_calendar() {
        let gateway = ScriptedGateway::default();
        let wizard = tokio_test::block_on(open_booking(&gateway, "azure-loft", d(2025, 5, 1))).unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirm);
        assert!(wizard.draft.constraints().blocked.contains(&d(2025, 7, 1)));

        let missing = tokio_test::block_on(open_booking(&gateway, "nowhere", d(2025, 5, 1)));
        assert!(matches!(missing, Err(BookingError::NotFound(_))));
    }

    #[test]
    fn test_open_booking_near_the_end_of_the_calendar() {
        let gateway = ScriptedGateway::default();
        let today = NaiveDate::MAX - Duration::days(10);
        let wizard = tokio_test::block_on(open_booking(&gateway, "azure-loft", today)).unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirm);
    }
}
