use thiserror::Error;

#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    pub name: String,
    pub description: Option<String>,
    /// Amount in the currency's minor unit.
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutSessionInput {
    pub booking_id: String,
    pub customer_email: Option<String>,
    pub line_item: CheckoutLineItem,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionHandle {
    pub session_id: String,
    pub checkout_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment provider is not configured")]
    NotConfigured,
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
    #[error("Payment provider request failed: {0}")]
    Provider(String),
}

pub trait CheckoutOperations {
    async fn create_checkout_session(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CheckoutSessionHandle, PaymentError>;
}
