pub mod account;
pub mod api;
pub mod bookings;
pub mod calendar;
pub mod property;
pub mod settings;
