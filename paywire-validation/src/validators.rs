// Built-in validators
//
// Errors carry the field name and a message, never the rejected value.

use crate::ValidationError;
use regex::Regex;

/// Rejects empty and whitespace-only values
pub struct NotBlank;

impl NotBlank {
    pub fn validate(value: &str, field: &str, message: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, message).with_constraint("notBlank"))
        } else {
            Ok(())
        }
    }
}

/// Maximum length in characters
pub struct MaxLength(pub usize);

impl MaxLength {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        let message = format!("{} must not exceed {} characters", field, self.0);
        self.validate_with(value, field, &message)
    }

    pub fn validate_with(
        &self,
        value: &str,
        field: &str,
        message: &str,
    ) -> Result<(), ValidationError> {
        if value.chars().count() > self.0 {
            Err(ValidationError::new(field, message).with_constraint("maxLength"))
        } else {
            Ok(())
        }
    }
}

/// Full-value regex match against a precompiled pattern
pub struct Matches<'a> {
    regex: &'a Regex,
    message: &'a str,
}

impl<'a> Matches<'a> {
    pub fn new(regex: &'a Regex, message: &'a str) -> Self {
        Self { regex, message }
    }

    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if self.regex.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::new(field, self.message).with_constraint("matches"))
        }
    }
}
