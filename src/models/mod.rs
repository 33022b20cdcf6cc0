//! Domain types: database rows, request payloads, and patch structs.
//!
//! Patch structs distinguish "field absent" from "field set to null" for
//! nullable columns via a double `Option` (`None` = untouched,
//! `Some(None)` = cleared, `Some(Some(v))` = replaced).

mod appointment;
mod clinic;
mod user;
pub mod validate;

pub use appointment::{
    AdminStats, Appointment, AppointmentPatch, AppointmentStatus, BookAppointmentRequest,
    ClinicStats, RescheduleRecord, RescheduleRequest, StatusUpdateRequest,
};
pub use clinic::{Clinic, ClinicFilter, ClinicPatch, CreateClinicRequest};
pub use user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, RegisterRequest, Role,
    UpdateProfileRequest, User,
};

use serde::{Deserialize, Deserializer};

/// Deserializer for double-`Option` patch fields: a key that is present
/// (even as JSON `null`) becomes `Some(..)`, a missing key stays `None`
/// through `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
