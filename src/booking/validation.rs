use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Contact details entered on the guest-info step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestField {
    FirstName,
    LastName,
    Email,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldError {
    Required,
    InvalidFormat,
}

impl FieldError {
    pub fn message(&self, field: GuestField) -> &'static str {
        match (self, field) {
            (FieldError::Required, GuestField::FirstName) => "First name is required",
            (FieldError::Required, GuestField::LastName) => "Last name is required",
            (FieldError::Required, GuestField::Email) => "Email is required",
            (FieldError::Required, GuestField::Phone) => "Phone number is required",
            (FieldError::InvalidFormat, _) => "Please enter a valid email address",
        }
    }
}

pub type FieldErrorMap = BTreeMap<GuestField, FieldError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: FieldErrorMap,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn validate(guest: &GuestInfo) -> ValidationReport {
    let mut errors = FieldErrorMap::new();

    let required = [
        (GuestField::FirstName, &guest.first_name),
        (GuestField::LastName, &guest.last_name),
        (GuestField::Phone, &guest.phone),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.insert(field, FieldError::Required);
        }
    }

    if guest.email.trim().is_empty() {
        errors.insert(GuestField::Email, FieldError::Required);
    } else if !is_valid_email(&guest.email) {
        errors.insert(GuestField::Email, FieldError::InvalidFormat);
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
