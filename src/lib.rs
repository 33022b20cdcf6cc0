//! # ClinicHub Backend
//!
//! Appointment booking API for a clinic directory. Public users browse
//! clinics and book, reschedule, or cancel appointments; clinic-staff and
//! admin accounts manage appointments and clinic records through role-scoped
//! views of the same data.
//!
//! The crate is layered so the business core never touches HTTP:
//!
//! ```text
//! HTTP/JSON -> handlers -> service -> store -> SQLite
//!                 |           |
//!               auth        models
//! ```
//!
//! Every service operation returns [`error::ApiError`] on failure, which the
//! axum layer maps to a status code and JSON envelope. The stores are plain
//! handles over one [`db::Database`] pool, constructed at startup and passed
//! in explicitly.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;

pub use error::{ApiError, Result};
pub use handlers::AppState;
