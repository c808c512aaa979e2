use log::{error, warn};
use std::collections::HashMap;

use crate::services::payment::interface::{
    CheckoutOperations, CheckoutSessionHandle, CheckoutSessionInput, PaymentError,
};

pub struct StripeProvider {
    pub client: stripe::Client,
    pub currency: stripe::Currency,
}

impl StripeProvider {
    pub fn new(api_key: impl Into<String>, currency: &str) -> Self {
        Self {
            client: stripe::Client::new(api_key.into()),
            currency: parse_currency(currency).unwrap_or_else(|| {
                warn!("Unknown currency {:?}, falling back to PHP", currency);
                stripe::Currency::PHP
            }),
        }
    }
}

/// Stripe currency codes are lowercase ISO 4217 strings.
pub fn parse_currency(code: &str) -> Option<stripe::Currency> {
    serde_json::from_value(serde_json::Value::String(code.trim().to_lowercase())).ok()
}

impl CheckoutOperations for StripeProvider {
    async fn create_checkout_session(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CheckoutSessionHandle, PaymentError> {
        if input.line_item.amount <= 0 {
            return Err(PaymentError::InvalidAmount(input.line_item.amount));
        }

        let mut metadata = HashMap::new();
        metadata.insert("booking_id".to_string(), input.booking_id.clone());

        let mut params = stripe::CreateCheckoutSession::new();
        params.mode = Some(stripe::CheckoutSessionMode::Payment);
        params.success_url = Some(input.success_url.as_str());
        params.cancel_url = Some(input.cancel_url.as_str());
        params.client_reference_id = Some(input.booking_id.as_str());
        params.customer_email = input.customer_email.as_deref();
        params.metadata = Some(metadata);
        params.line_items = Some(vec![stripe::CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(stripe::CreateCheckoutSessionLineItemsPriceData {
                currency: self.currency,
                unit_amount: Some(input.line_item.amount),
                product_data: Some(stripe::CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: input.line_item.name.clone(),
                    description: input.line_item.description.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        match stripe::CheckoutSession::create(&self.client, params).await {
            Ok(session) => Ok(CheckoutSessionHandle {
                session_id: session.id.to_string(),
                checkout_url: session.url,
            }),
            Err(e) => {
                error!("Error creating checkout session: {:?}", e);
                Err(PaymentError::Provider(e.to_string()))
            }
        }
    }
}
