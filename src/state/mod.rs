//! Session state management modules.

mod action;
mod interaction;
mod session;

pub use action::Action;
pub use interaction::Gesture;
pub use session::Session;
