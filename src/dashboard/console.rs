use chrono::NaiveDate;
use log::warn;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::optimistic::Optimistic;
use super::session::SessionContext;
use crate::models::account::{AdminCredentials, AdminToken};
use crate::models::bookings::{BookingListItem, BookingStatus, StatusUpdate};
use crate::models::property::{PropertyDetails, PropertyFlagsUpdate};
use crate::models::settings::SiteSettings;
use crate::services::api_client::{base_directory, Reply};
use crate::services::revenue_service::RevenueReport;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    #[error("Please sign in")]
    NotSignedIn,
    #[error("Session expired, please sign in again")]
    Unauthorized,
    #[error("{0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Network(err.to_string())
    }
}

/// Client for the admin endpoints under `/api/admin`.
#[derive(Clone)]
pub struct AdminConsole {
    base_url: Url,
    client: reqwest::Client,
}

impl AdminConsole {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: base_directory(base_url),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConsoleError> {
        self.base_url
            .join(path)
            .map_err(|e| ConsoleError::Network(format!("Invalid URL {}: {}", path, e)))
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ConsoleError> {
        match Reply::read(response).await? {
            Reply::Data(data) => Ok(data),
            Reply::Rejected { status, .. } if status == StatusCode::UNAUTHORIZED => {
                Err(ConsoleError::Unauthorized)
            }
            Reply::Rejected { status, error } => Err(ConsoleError::Api(
                error.unwrap_or_else(|| format!("Request failed ({})", status)),
            )),
        }
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        session: &SessionContext,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ConsoleError> {
        let token = session.bearer().ok_or(ConsoleError::NotSignedIn)?;
        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::read(request.send().await?).await
    }

    /// Logs in and loads site settings into `session`.
    pub async fn sign_in(
        &self,
        session: &mut SessionContext,
        email: &str,
        password: &str,
    ) -> Result<(), ConsoleError> {
        let credentials = AdminCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint("api/admin/login")?)
            .json(&credentials)
            .send()
            .await?;
        let token: AdminToken = Self::read(response).await?;

        let response = self.client.get(self.endpoint("api/settings")?).send().await?;
        let settings: SiteSettings = Self::read(response).await?;

        session.sign_in(email, token, settings);
        Ok(())
    }

    pub async fn bookings(
        &self,
        session: &SessionContext,
        status: Option<BookingStatus>,
        property_id: Option<&str>,
    ) -> Result<Vec<BookingListItem>, ConsoleError> {
        let mut url = self.endpoint("api/admin/bookings")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(status) = status {
                query.append_pair("status", status.as_str());
            }
            if let Some(property_id) = property_id {
                query.append_pair("propertyId", property_id);
            }
        }
        self.send::<(), _>(session, Method::GET, url, None).await
    }

    pub async fn update_status(
        &self,
        session: &SessionContext,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<BookingListItem, ConsoleError> {
        let url = self.endpoint(&format!("api/admin/bookings/{}/status", booking_id))?;
        self.send(session, Method::PATCH, url, Some(&StatusUpdate { status }))
            .await
    }

    pub async fn set_property_flags(
        &self,
        session: &SessionContext,
        property_id: &str,
        update: &PropertyFlagsUpdate,
    ) -> Result<PropertyDetails, ConsoleError> {
        let url = self.endpoint(&format!("api/admin/properties/{}", property_id))?;
        self.send(session, Method::PATCH, url, Some(update)).await
    }

    /// Flips the toggle immediately and reverts it if the server refuses.
    pub async fn toggle_property_active(
        &self,
        session: &SessionContext,
        property_id: &str,
        active: &mut Optimistic<bool>,
    ) -> Result<(), ConsoleError> {
        let next = !*active.current();
        let result = active
            .update(next, |value| async move {
                let update = PropertyFlagsUpdate {
                    active: Some(value),
                    featured: None,
                };
                self.set_property_flags(session, property_id, &update)
                    .await
                    .map(|_| ())
            })
            .await;
        if let Err(err) = &result {
            warn!("Reverted active toggle for property {}: {}", property_id, err);
        }
        result
    }

    pub async fn revenue(
        &self,
        session: &SessionContext,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<RevenueReport, ConsoleError> {
        let mut url = self.endpoint("api/admin/revenue")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(from) = from {
                query.append_pair("from", &from.to_string());
            }
            if let Some(to) = to {
                query.append_pair("to", &to.to_string());
            }
        }
        self.send::<(), _>(session, Method::GET, url, None).await
    }
}
