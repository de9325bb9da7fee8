// Configuration validation

use crate::{ConfigError, Result};

/// Implemented by typed settings that carry their own constraints
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable checks for [`Validate`] implementations
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject empty or whitespace-only values
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Reject values outside `min..=max`
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                field, min, max, value
            )));
        }
        Ok(())
    }
}
