#![allow(dead_code)]

use clinichub_backend::auth::{Caller, JwtKeys};
use clinichub_backend::db::Database;
use clinichub_backend::models::{
    BookAppointmentRequest, PublicUser, RegisterRequest, Role,
};
use clinichub_backend::service::{AppointmentService, AuthService};
use clinichub_backend::store::{AppointmentStore, ClinicStore, UserStore};

/// Fully wired service stack over a fresh in-memory database.
pub struct TestApp {
    pub db: Database,
    pub users: UserStore,
    pub clinics: ClinicStore,
    pub ledger: AppointmentStore,
    pub auth: AuthService,
    pub appointments: AppointmentService,
    pub jwt: JwtKeys,
}

pub async fn test_app() -> TestApp {
    let db = Database::in_memory().await.expect("in-memory database");
    let users = UserStore::new(&db);
    let clinics = ClinicStore::new(&db);
    let ledger = AppointmentStore::new(&db);
    let jwt = JwtKeys::new("test-secret", 30);
    TestApp {
        auth: AuthService::new(users.clone(), jwt.clone()),
        appointments: AppointmentService::new(ledger.clone(), clinics.clone()),
        db,
        users,
        clinics,
        ledger,
        jwt,
    }
}

pub async fn register(app: &TestApp, name: &str, email: &str) -> PublicUser {
    app.auth
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            phone: None,
            role: None,
            clinic_id: None,
        })
        .await
        .expect("register user")
        .user
}

pub async fn register_clinic_staff(
    app: &TestApp,
    name: &str,
    email: &str,
    clinic_id: i64,
) -> PublicUser {
    app.auth
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            phone: None,
            role: Some(Role::Clinic),
            clinic_id: Some(clinic_id),
        })
        .await
        .expect("register clinic staff")
        .user
}

pub fn caller(user: &PublicUser) -> Caller {
    Caller {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        clinic_id: user.clinic_id,
    }
}

pub fn booking(clinic: &str, date: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        name: "Jordan Reyes".to_string(),
        email: "jordan@example.com".to_string(),
        phone: "555-0101".to_string(),
        area: "Downtown".to_string(),
        clinic: clinic.to_string(),
        department: "Dental".to_string(),
        date: date.to_string(),
        message: None,
    }
}

pub async fn create_clinic(app: &TestApp, name: &str, category: &str) -> i64 {
    app.clinics
        .create(&clinichub_backend::models::CreateClinicRequest {
            name: name.to_string(),
            category: category.to_string(),
            description: None,
            address: None,
            phone: None,
            email: None,
            image: None,
            rating: None,
            is_active: None,
        })
        .await
        .expect("create clinic")
        .id
}
