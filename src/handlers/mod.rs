//! HTTP surface. Handlers translate between JSON envelopes and the service
//! layer; no business rule lives here.
//!
//! Success envelopes mirror the shape clients expect: `success: true`, an
//! optional `message`, the resource payload, and a `count` alongside every
//! collection.

mod admin;
mod appointments;
mod auth;
mod clinic_portal;
mod clinics;

use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::auth::JwtKeys;
use crate::config::Settings;
use crate::db::Database;
use crate::service::{AppointmentService, AuthService};
use crate::store::{AppointmentStore, ClinicStore, UserStore};

/// Everything a request handler needs, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtKeys,
    pub users: UserStore,
    pub clinics: ClinicStore,
    pub auth: AuthService,
    pub appointments: AppointmentService,
}

impl AppState {
    pub fn new(db: &Database, settings: &Settings) -> Self {
        let jwt = JwtKeys::new(&settings.jwt.secret, settings.jwt.expiration_days);
        let users = UserStore::new(db);
        let clinics = ClinicStore::new(db);
        let appointments =
            AppointmentService::new(AppointmentStore::new(db), clinics.clone());
        let auth = AuthService::new(users.clone(), jwt.clone());
        Self {
            jwt,
            users,
            clinics,
            auth,
            appointments,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // Authentication
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/auth/password", put(auth::change_password))
        // Appointments (public booking, owner-scoped management)
        .route(
            "/api/appointments",
            post(appointments::book).get(appointments::list_own),
        )
        .route(
            "/api/appointments/{id}",
            get(appointments::get_one)
                .put(appointments::update)
                .delete(appointments::cancel),
        )
        .route(
            "/api/appointments/{id}/reschedule",
            put(appointments::reschedule),
        )
        // Public clinic directory
        .route("/api/clinics", get(clinics::list))
        .route("/api/clinics/{id}", get(clinics::get_one))
        // Clinic portal (clinic role)
        .route("/api/clinic/appointments", get(clinic_portal::appointments))
        .route("/api/clinic/stats", get(clinic_portal::stats))
        .route("/api/clinic/profile", get(clinic_portal::profile))
        .route(
            "/api/clinic/appointments/{id}/status",
            put(clinic_portal::update_status),
        )
        // Admin
        .route("/api/admin/appointments", get(admin::appointments))
        .route("/api/admin/users", get(admin::users))
        .route("/api/admin/stats", get(admin::stats))
        .route(
            "/api/admin/clinics",
            get(admin::list_clinics).post(admin::create_clinic),
        )
        .route(
            "/api/admin/clinics/{id}",
            put(admin::update_clinic).delete(admin::delete_clinic),
        )
        .route(
            "/api/admin/clinic-appointments/{clinic_id}",
            get(admin::clinic_appointments),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "ClinicHub API is running" }))
}
