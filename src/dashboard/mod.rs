//! Admin dashboard client: signed-in session state, optimistic toggles and
//! the calls behind the bookings, properties and revenue screens.

pub mod console;
pub mod optimistic;
pub mod session;

pub use console::{AdminConsole, ConsoleError};
pub use optimistic::Optimistic;
pub use session::SessionContext;
