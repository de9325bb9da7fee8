//! Field-level validation for Paywire inputs
//!
//! Every failing rule of an input is collected into one [`ValidationErrors`],
//! so callers can report all problems at once.
//!
//! ```
//! use paywire_validation::{MaxLength, NotBlank, Validate, ValidationErrors, ValidationRules};
//!
//! struct Subscription {
//!     url: String,
//! }
//!
//! impl Validate for Subscription {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         ValidationRules::for_field("url")
//!             .add(|value, field| NotBlank::validate(value, field, "URL is required"))
//!             .add(|value, field| MaxLength(500).validate(value, field))
//!             .check(&self.url)
//!             .into_result()
//!     }
//! }
//!
//! let bad = Subscription { url: " ".to_string() };
//! let errors = bad.validate().unwrap_err();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.errors[0].to_string(), "url: URL is required");
//! ```

mod errors;
mod rules;
mod validators;

pub use errors::*;
pub use rules::*;
pub use validators::*;

/// Implemented by inputs that carry their own constraints
pub trait Validate {
    /// Validate the value, returning every failed rule
    fn validate(&self) -> Result<(), ValidationErrors>;
}
