// Validation rules builder

use crate::{ValidationError, ValidationErrors};
use std::sync::Arc;

type ValidatorFn = Arc<dyn Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync>;

/// Ordered validators for one field
#[derive(Clone)]
pub struct ValidationRules {
    validators: Vec<ValidatorFn>,
    field: String,
}

impl ValidationRules {
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            validators: Vec::new(),
            field: field.into(),
        }
    }

    /// Add a validator function, called with `(value, field)`
    #[allow(clippy::should_implement_trait)]
    pub fn add<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Run every validator and collect the failures
    pub fn check(&self, value: &str) -> ValidationErrors {
        self.validators
            .iter()
            .filter_map(|validator| validator(value, &self.field).err())
            .collect::<Vec<_>>()
            .into()
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl std::fmt::Debug for ValidationRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRules")
            .field("field", &self.field)
            .field("validators", &self.validators.len())
            .finish()
    }
}
