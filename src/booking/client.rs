use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::error::{BookingError, FALLBACK_MESSAGE};
use super::submitter::BookingGateway;
use crate::models::bookings::{BookingCreated, BookingRequest, CheckoutCreated, CheckoutRequest};
use crate::models::calendar::Availability;
use crate::models::property::PropertyDetails;
use crate::services::api_client::{base_directory, Reply};

/// reqwest-backed gateway to the site's `/api` endpoints.
#[derive(Clone)]
pub struct HttpBookingGateway {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpBookingGateway {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: base_directory(base_url),
            client: reqwest::Client::new(),
        }
    }

    /// No timeout is applied unless one is given here.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, BookingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_directory(base_url),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BookingError> {
        self.base_url
            .join(path)
            .map_err(|e| BookingError::Network(format!("Invalid URL {}: {}", path, e)))
    }

    async fn read<T: DeserializeOwned>(
        response: reqwest::Response,
        not_found: &str,
    ) -> Result<T, BookingError> {
        match Reply::read(response).await? {
            Reply::Data(data) => Ok(data),
            Reply::Rejected { status, error } if status == StatusCode::NOT_FOUND => Err(
                BookingError::NotFound(error.unwrap_or_else(|| not_found.to_string())),
            ),
            Reply::Rejected { error, .. } => Err(BookingError::Submission(
                error.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            )),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Option<&str>,
    ) -> Result<T, BookingError> {
        let mut request = self.client.post(self.endpoint(path)?).json(body);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }
        let response = request.send().await?;
        Self::read(response, "Not found").await
    }
}

impl BookingGateway for HttpBookingGateway {
    async fn fetch_property(&self, slug: &str) -> Result<PropertyDetails, BookingError> {
        let url = self.endpoint(&format!("api/properties/{}", slug))?;
        let response = self.client.get(url).send().await?;
        Self::read(response, "Property not found").await
    }

    async fn fetch_availability(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Availability, BookingError> {
        let mut url = self.endpoint(&format!("api/properties/{}/calendar", slug))?;
        url.query_pairs_mut()
            .append_pair("from", &from.to_string())
            .append_pair("to", &to.to_string());
        let response = self.client.get(url).send().await?;
        Self::read(response, "Property not found").await
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingCreated, BookingError> {
        self.post("api/bookings", request, request.idempotency_key.as_deref())
            .await
    }

    async fn create_checkout(&self, booking_id: &str) -> Result<CheckoutCreated, BookingError> {
        let body = CheckoutRequest {
            booking_id: booking_id.to_string(),
        };
        self.post("api/payments/create-checkout", &body, None).await
    }
}
