#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Account onboarding (login, signup, logout) against a hosted identity provider,"]
#![doc = "reconciliation of the local `users` table, the session gate for task routes and"]
#![doc = "board listing. The binary (`main.rs`) wires the production adapters together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod onboarding;
pub mod provider;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
