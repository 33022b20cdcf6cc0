//! Persistence layer: one store per relation, each a thin handle over the
//! shared [`crate::db::Database`] pool. Stores own all SQL; services own all
//! business rules.

mod appointments;
mod clinics;
mod users;

pub use appointments::AppointmentStore;
pub use clinics::ClinicStore;
pub use users::UserStore;
