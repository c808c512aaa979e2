pub mod api_client;
pub mod availability_service;
pub mod payment;
pub mod pricing_service;
pub mod revenue_service;
pub mod stripe;
