use std::{fmt, ops::RangeInclusive, str::FromStr};

use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{email_address::EmailAddress, macros::nutype_string, SearchTerm};

#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deref,
    From,
    Display,
    Serialize,
    Deserialize,
))]
pub struct ContactMessageId(i64);

/// A contact form submission.
///
/// The record only holds data. Constraints on its content are checked by
/// [`ContactMessage::validate`], which has to be called before the message is
/// handed to the persistence layer. `id` and `submitted_at` are assigned by
/// the persistence layer and stay unset for messages that have never been
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    id: Option<ContactMessageId>,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    message: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
}

impl ContactMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<ContactMessageId> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<ContactMessageId>) {
        self.id = id;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn set_submitted_at(&mut self, submitted_at: Option<DateTime<Utc>>) {
        self.submitted_at = submitted_at;
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Builds the record of a message that has been read from storage.
    pub fn stored(
        id: ContactMessageId,
        form: ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            submitted_at: Some(submitted_at),
            ..form.into()
        }
    }

    /// Checks every field of the message and collects all constraint
    /// violations.
    ///
    /// Returns the validated content on success. Violations are reported in
    /// field order (name, phone, email, message); a single field may produce
    /// more than one violation.
    pub fn validate(&self) -> Result<ContactForm, ValidationFailure> {
        let mut violations = Vec::new();

        let name = validate_name(self.name(), &mut violations);
        let phone = validate_phone(self.phone(), &mut violations);
        let email = validate_email(self.email(), &mut violations);
        let message = validate_message(self.message(), &mut violations);

        match (name, phone, email, message) {
            (Some(name), Some(phone), Some(email), Some(message)) if violations.is_empty() => {
                Ok(ContactForm {
                    name,
                    phone,
                    email,
                    message,
                })
            }
            _ => Err(ValidationFailure(violations)),
        }
    }
}

/// The validated content of a [`ContactMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: ContactName,
    pub phone: ContactPhone,
    pub email: EmailAddress,
    pub message: ContactBody,
}

impl From<ContactForm> for ContactMessage {
    fn from(form: ContactForm) -> Self {
        Self {
            id: None,
            name: Some(form.name.into_inner()),
            phone: Some(form.phone.into_inner()),
            email: Some(form.email.as_str().to_owned()),
            message: Some(form.message.into_inner()),
            submitted_at: None,
        }
    }
}

nutype_string!(ContactName(validate(
    predicate = |x| !x.trim().is_empty(),
    len_char_min = 5,
    len_char_max = 100,
)));

impl ContactName {
    pub const LEN: RangeInclusive<usize> = 5..=100;
}

nutype_string!(ContactPhone(validate(len_char_min = 10, len_char_max = 14)));

impl ContactPhone {
    pub const LEN: RangeInclusive<usize> = 10..=14;
}

#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Deref,
    AsRef,
    From,
    Display,
    Serialize,
    Deserialize,
))]
pub struct ContactBody(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Message,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: ContactField,
    pub message: &'static str,
}

impl FieldViolation {
    pub const NAME_REQUIRED: Self = Self {
        field: ContactField::Name,
        message: "The name is required and must not be blank.",
    };
    pub const NAME_LENGTH: Self = Self {
        field: ContactField::Name,
        message: "The name must contain between 5 and 100 characters.",
    };
    pub const PHONE_REQUIRED: Self = Self {
        field: ContactField::Phone,
        message: "The phone number is required.",
    };
    pub const PHONE_LENGTH: Self = Self {
        field: ContactField::Phone,
        message: "The phone number must contain between 10 and 14 characters.",
    };
    pub const EMAIL_REQUIRED: Self = Self {
        field: ContactField::Email,
        message: "The email address is required.",
    };
    pub const EMAIL_INVALID: Self = Self {
        field: ContactField::Email,
        message: "The email address is invalid.",
    };
    pub const MESSAGE_REQUIRED: Self = Self {
        field: ContactField::Message,
        message: "The message is required.",
    };
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A contact message did not satisfy its constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", display_violations(.0))]
pub struct ValidationFailure(pub Vec<FieldViolation>);

impl ValidationFailure {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Returns whether `field` has at least one violation.
    pub fn has(&self, field: ContactField) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn contains(&self, violation: FieldViolation) -> bool {
        self.0.contains(&violation)
    }
}

fn display_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn validate_name(name: Option<&str>, violations: &mut Vec<FieldViolation>) -> Option<ContactName> {
    let Some(name) = name else {
        violations.push(FieldViolation::NAME_REQUIRED);
        return None;
    };
    if name.trim().is_empty() {
        violations.push(FieldViolation::NAME_REQUIRED);
    }
    if !ContactName::LEN.contains(&name.chars().count()) {
        violations.push(FieldViolation::NAME_LENGTH);
    }
    ContactName::try_new(name).ok()
}

fn validate_phone(
    phone: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<ContactPhone> {
    let Some(phone) = phone else {
        violations.push(FieldViolation::PHONE_REQUIRED);
        return None;
    };
    if !ContactPhone::LEN.contains(&phone.chars().count()) {
        violations.push(FieldViolation::PHONE_LENGTH);
    }
    ContactPhone::try_new(phone).ok()
}

fn validate_email(
    email: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<EmailAddress> {
    let Some(email) = email else {
        violations.push(FieldViolation::EMAIL_REQUIRED);
        return None;
    };
    EmailAddress::from_str(email)
        .inspect_err(|_| violations.push(FieldViolation::EMAIL_INVALID))
        .ok()
}

fn validate_message(
    message: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<ContactBody> {
    let Some(message) = message else {
        violations.push(FieldViolation::MESSAGE_REQUIRED);
        return None;
    };
    Some(ContactBody::new(message))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMessageFilter {
    pub name: Option<SearchTerm>,
    pub email: Option<SearchTerm>,
}
