//! Field-level request validation, collected into the `ValidationError`
//! outcome so a single response reports every bad field.

use crate::error::{ApiError, FieldError, Result};

pub struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, message);
        }
        self
    }

    pub fn require_email(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_well_formed_email(value) {
            self.push(field, "Please provide a valid email");
        }
        self
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) -> &mut Self {
        if value.chars().count() < min {
            self.push(field, message);
        }
        self
    }

    pub fn push(&mut self, field: &str, message: &str) -> &mut Self {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
        self
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural check only: one `@` with a non-empty local part and a dotted
/// domain. Deliverability is the mail system's problem.
pub fn is_well_formed_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !domain.contains(' '),
        None => false,
    }
}
