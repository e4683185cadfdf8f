//! Request logic that sits between the HTTP handlers and the store.
//!
//! Each function takes its collaborators as plain arguments, so it can be
//! driven directly from tests without building an app.

pub mod profile;
pub mod registration;
pub mod session;

pub use profile::{read_profile, update_profile};
pub use registration::register;
pub use session::{refresh, sign_in};
