use log::{debug, error};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::models::api::ApiResponse;

/// Treats `base_url` as a directory so relative endpoints join under its path.
pub fn base_directory(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

/// Outcome of one call against the site's `/api` envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Data(T),
    /// Non-2xx status, `success: false`, missing data or an unreadable body.
    Rejected {
        status: StatusCode,
        error: Option<String>,
    },
}

impl<T: DeserializeOwned> Reply<T> {
    pub fn decode(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiResponse<T>>(body) {
            Ok(ApiResponse {
                success: true,
                data: Some(data),
                ..
            }) if status.is_success() => Reply::Data(data),
            Ok(ApiResponse { error, .. }) => Reply::Rejected {
                status,
                error: error.filter(|e| !e.trim().is_empty()),
            },
            Err(err) => {
                error!("Unreadable response ({}): {:?}", status, err);
                Reply::Rejected {
                    status,
                    error: None,
                }
            }
        }
    }

    pub async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Response status: {}, body: {}", status, body);
        Ok(Self::decode(status, &body))
    }
}
