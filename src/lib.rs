#![doc = "The `listify` library crate."]
#![doc = ""]
#![doc = "Accounts, sessions and role profiles for a marketplace that connects"]
#![doc = "barbers, cosmetologists and tattoo artists (TALENT) with shops (SCOUT)."]
#![doc = "The binary in `main.rs` wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

pub use error::AppError;
pub use state::AppState;
