//! Submitted form values and field validation
//!
//! Text inputs are stripped of surrounding whitespace before validation and
//! a blank input counts as absent. Every helper records its message in a
//! shared [`ValidationErrors`] so one submission reports all problems.

use crate::adapters::database::constraints;
use crate::domain::{PortalError, Role, StoreError, ValidationErrors};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Accepted `date_of_birth` input formats, tried in order.
///
/// `%y` comes before `%Y` because chrono's `%Y` also takes two-digit years.
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Raw `application/x-www-form-urlencoded` values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }

    /// Raw value, untouched
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Stripped value; `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.raw(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Submitted values with password fields removed, for re-rendering a form
    pub fn redisplay(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .filter(|(name, _)| !name.contains("password"))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl From<HashMap<String, String>> for FormFields {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        )
        .expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

fn max_length_message(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

fn min_length_message(min: usize, actual: usize) -> String {
    format!("Ensure this value has at least {min} characters (it has {actual}).")
}

/// Field-by-field reader that accumulates errors
pub struct FieldReader<'a> {
    fields: &'a FormFields,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a FormFields) -> Self {
        Self {
            fields,
            errors: ValidationErrors::new(),
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn has_error(&self, name: &str) -> bool {
        self.errors.has(name)
    }

    pub fn add_error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.add(name, message);
    }

    /// `Err(Validation)` when anything was recorded
    pub fn finish(self) -> Result<(), PortalError> {
        self.errors.into_result()
    }

    fn input(&self, name: &str) -> Option<&'a str> {
        self.fields.text(name)
    }

    fn bounded(&mut self, name: &str, value: &str, max: Option<usize>) -> Option<String> {
        let length = value.chars().count();
        match max {
            Some(max) if length > max => {
                self.errors.add(name, max_length_message(max, length));
                None
            }
            _ => Some(value.to_string()),
        }
    }

    pub fn required_text(&mut self, name: &str, max: Option<usize>) -> Option<String> {
        match self.input(name) {
            Some(value) => self.bounded(name, value, max),
            None => {
                self.errors.add(name, REQUIRED);
                None
            }
        }
    }

    pub fn optional_text(&mut self, name: &str, max: Option<usize>) -> Option<String> {
        let value = self.input(name)?;
        self.bounded(name, value, max)
    }

    fn checked_email(&mut self, name: &str, value: &str, max: usize) -> Option<String> {
        if !is_valid_email(value) {
            self.errors.add(name, INVALID_EMAIL);
            return None;
        }
        self.bounded(name, value, Some(max))
    }

    pub fn required_email(&mut self, name: &str, max: usize) -> Option<String> {
        match self.input(name) {
            Some(value) => self.checked_email(name, value, max),
            None => {
                self.errors.add(name, REQUIRED);
                None
            }
        }
    }

    pub fn optional_email(&mut self, name: &str, max: usize) -> Option<String> {
        let value = self.input(name)?;
        self.checked_email(name, value, max)
    }

    fn parsed_choice<T: FromStr<Err = String>>(&mut self, name: &str, value: &str) -> Option<T> {
        match value.parse() {
            Ok(choice) => Some(choice),
            Err(reason) => {
                self.errors
                    .add(name, format!("Select a valid choice. {reason}"));
                None
            }
        }
    }

    pub fn required_choice<T: FromStr<Err = String>>(&mut self, name: &str) -> Option<T> {
        match self.input(name) {
            Some(value) => self.parsed_choice(name, value),
            None => {
                self.errors.add(name, REQUIRED);
                None
            }
        }
    }

    pub fn optional_choice<T: FromStr<Err = String>>(&mut self, name: &str) -> Option<T> {
        let value = self.input(name)?;
        self.parsed_choice(name, value)
    }

    pub fn optional_date(&mut self, name: &str) -> Option<NaiveDate> {
        let value = self.input(name)?;
        let parsed = DATE_INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok());
        if parsed.is_none() {
            self.errors.add(name, INVALID_DATE);
        }
        parsed
    }

    fn checked_password(&mut self, name: &str, value: &str) -> Option<String> {
        let length = value.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            self.errors
                .add(name, min_length_message(MIN_PASSWORD_LENGTH, length));
            return None;
        }
        Some(value.to_string())
    }

    /// Password that must be present and at least eight characters
    pub fn new_password(&mut self, name: &str) -> Option<String> {
        match self.input(name) {
            Some(value) => self.checked_password(name, value),
            None => {
                self.errors.add(name, REQUIRED);
                None
            }
        }
    }

    /// Password change on an edit form; blank keeps the stored one
    pub fn changed_password(&mut self, name: &str) -> Option<String> {
        let value = self.input(name)?;
        self.checked_password(name, value)
    }
}

/// "A patient with this email already exists." and friends
pub fn duplicate_message(role: Role, field: &str) -> String {
    let article = match role {
        Role::Admin => "An",
        _ => "A",
    };
    let label = field.replace('_', " ");
    format!("{article} {role} with this {label} already exists.")
}

/// Folds a unique-constraint violation into a field error
///
/// Other errors pass through unchanged.
pub fn unique_violation_to_field_error(role: Role, err: PortalError) -> PortalError {
    let field = match &err {
        PortalError::Store(StoreError::UniqueViolation { constraint }) => {
            constraints::field_for(constraint)
        }
        _ => None,
    };
    match field {
        Some(field) => {
            tracing::info!(role = %role, field = field, "Unique constraint raced validation");
            ValidationErrors::single(field, duplicate_message(role, field)).into()
        }
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BloodGroup, Gender};
    use test_case::test_case;

    #[test_case("a@x.com", true)]
    #[test_case("first.last+tag@mail.example.org", true)]
    #[test_case("no-at-sign", false)]
    #[test_case("two@@x.com", false)]
    #[test_case("a@x", false)]
    #[test_case("a b@x.com", false)]
    fn test_email_format(value: &str, valid: bool) {
        assert_eq!(is_valid_email(value), valid);
    }

    #[test]
    fn test_text_is_stripped_and_blank_is_absent() {
        let fields = FormFields::new().with("a", "  Ann ").with("b", "   ");
        assert_eq!(fields.text("a"), Some("Ann"));
        assert_eq!(fields.text("b"), None);
        assert_eq!(fields.text("c"), None);
        assert_eq!(fields.raw("a"), Some("  Ann "));
    }

    #[test]
    fn test_errors_aggregate_across_fields() {
        let fields = FormFields::new()
            .with("email", "nope")
            .with("gender", "robot")
            .with("password", "short");
        let mut reader = FieldReader::new(&fields);
        assert!(reader.required_email("email", EMAIL_MAX_LENGTH).is_none());
        assert!(reader.required_text("first_name", Some(100)).is_none());
        assert!(reader.required_choice::<Gender>("gender").is_none());
        assert!(reader.new_password("password").is_none());

        let errors = reader.errors().clone();
        assert_eq!(errors.get("email"), [INVALID_EMAIL.to_string()]);
        assert_eq!(errors.get("first_name"), [REQUIRED.to_string()]);
        assert_eq!(
            errors.get("gender"),
            ["Select a valid choice. robot is not one of the available choices.".to_string()]
        );
        assert_eq!(
            errors.get("password"),
            ["Ensure this value has at least 8 characters (it has 5).".to_string()]
        );
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_max_length_counts_characters() {
        let fields = FormFields::new().with("height", "12345678901").with("weight", "ééééé");
        let mut reader = FieldReader::new(&fields);
        assert!(reader.required_text("height", Some(10)).is_none());
        assert_eq!(reader.required_text("weight", Some(10)).as_deref(), Some("ééééé"));
        assert_eq!(
            reader.errors().get("height"),
            ["Ensure this value has at most 10 characters (it has 11).".to_string()]
        );
    }

    #[test_case("1990-04-12" ; "iso")]
    #[test_case("04/12/1990" ; "us long year")]
    #[test_case("04/12/90" ; "us short year")]
    fn test_date_formats(input: &str) {
        let fields = FormFields::new().with("date_of_birth", input);
        let mut reader = FieldReader::new(&fields);
        assert_eq!(
            reader.optional_date("date_of_birth"),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert!(reader.finish().is_ok());
    }

    #[test_case("04/12/05", 2005 ; "short year before 69")]
    #[test_case("04/12/69", 1969 ; "short year from 69")]
    fn test_short_year_century(input: &str, year: i32) {
        let fields = FormFields::new().with("date_of_birth", input);
        let mut reader = FieldReader::new(&fields);
        assert_eq!(
            reader.optional_date("date_of_birth"),
            NaiveDate::from_ymd_opt(year, 4, 12)
        );
    }

    #[test]
    fn test_invalid_date() {
        let fields = FormFields::new().with("date_of_birth", "12th of never");
        let mut reader = FieldReader::new(&fields);
        assert_eq!(reader.optional_date("date_of_birth"), None);
        assert_eq!(reader.errors().get("date_of_birth"), [INVALID_DATE.to_string()]);
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let fields = FormFields::new().with("blood_group", "").with("password", "  ");
        let mut reader = FieldReader::new(&fields);
        assert_eq!(reader.optional_choice::<BloodGroup>("blood_group"), None);
        assert_eq!(reader.changed_password("password"), None);
        assert_eq!(reader.optional_email("email", EMAIL_MAX_LENGTH), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_duplicate_messages() {
        assert_eq!(
            duplicate_message(Role::Patient, "email"),
            "A patient with this email already exists."
        );
        assert_eq!(
            duplicate_message(Role::Pharmacist, "license_number"),
            "A pharmacist with this license number already exists."
        );
        assert_eq!(
            duplicate_message(Role::Admin, "email"),
            "An admin with this email already exists."
        );
    }

    #[test]
    fn test_unique_violation_becomes_field_error() {
        let err: PortalError = StoreError::UniqueViolation {
            constraint: constraints::PHARMACISTS_LICENSE.to_string(),
        }
        .into();
        let translated = unique_violation_to_field_error(Role::Pharmacist, err);
        let errors = translated.validation_errors().unwrap();
        assert_eq!(
            errors.get("license_number"),
            ["A pharmacist with this license number already exists.".to_string()]
        );

        let other: PortalError = StoreError::QueryFailed("boom".to_string()).into();
        assert!(matches!(
            unique_violation_to_field_error(Role::Patient, other),
            PortalError::Store(StoreError::QueryFailed(_))
        ));
    }

    #[test]
    fn test_redisplay_drops_passwords() {
        let fields = FormFields::new().with("email", "a@x.com").with("password", "secret123");
        let values = fields.redisplay();
        assert_eq!(values.get("email").map(String::as_str), Some("a@x.com"));
        assert!(!values.contains_key("password"));
    }
}
