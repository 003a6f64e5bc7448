//! Form model: the three required fields, their markers and validation rules.

use regex::Regex;
use std::sync::OnceLock;

/// Identifies one of the contact form's input controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Email,
    Message,
}

impl FieldId {
    pub fn all() -> [FieldId; 3] {
        [FieldId::Name, FieldId::Email, FieldId::Message]
    }

    /// Multipart field name sent to the endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Email => "email",
            FieldId::Message => "message",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldId::Name => "Name",
            FieldId::Email => "Email",
            FieldId::Message => "Message",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            FieldId::Name => 0,
            FieldId::Email => 1,
            FieldId::Message => 2,
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, FieldId::Email)
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, FieldId::Message)
    }
}

/// Visual marker attached to an input control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Neutral,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trimmed values of the three required fields, read at submit time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormFields {
    /// Builds the field set from raw control values, trimming each one.
    pub fn from_values(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Message => &self.message,
        }
    }

    /// Whole-form check applied before any network call.
    /// Emptiness is checked before the email format.
    pub fn check(&self) -> Result<(), ValidationError> {
        if FieldId::all().iter().any(|f| self.get(*f).is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    pub fn validate(&self) -> ValidationResult {
        match self.check() {
            Ok(()) => ValidationResult::Valid,
            Err(error) => ValidationResult::Invalid(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Marker a field should show after losing focus
pub fn validate_field(field: FieldId, value: &str) -> FieldState {
    let value = value.trim();
    if value.is_empty() {
        FieldState::Invalid
    } else if field.is_email() {
        if is_valid_email(value) {
            FieldState::Valid
        } else {
            FieldState::Invalid
        }
    } else {
        FieldState::Valid
    }
}
