//! Business orchestration. Services hold no state of their own beyond the
//! store handles they are constructed with; every operation returns a typed
//! outcome for the transport layer to map.

mod appointments;
mod auth;

pub use appointments::AppointmentService;
pub use auth::AuthService;
