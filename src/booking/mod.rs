//! Guest-facing booking flow: date and guest selection, contact validation,
//! the four-step wizard, and the two-phase submission to the site API.

pub mod client;
pub mod dates;
pub mod error;
pub mod submitter;
pub mod validation;
pub mod wizard;

pub use error::BookingError;
pub use submitter::{open_booking, BookingGateway, BookingSubmitter, Navigator};
pub use wizard::{BookingDraft, BookingWizard, WizardStep};
