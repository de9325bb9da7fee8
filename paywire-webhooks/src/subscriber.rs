//! Webhook subscribers

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use paywire_validation::{
    Matches, MaxLength, NotBlank, Validate, ValidationErrors, ValidationRules,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_URL_LENGTH: usize = 500;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.*$").unwrap());

/// A registered webhook endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: i64,

    /// Absolute http(s) URL notifications are POSTed to
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Only active subscribers receive notifications
    pub active: bool,

    #[serde(with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
}

/// A subscriber that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub url: String,
    pub description: Option<String>,
    pub active: bool,
}

impl NewSubscriber {
    /// An active subscriber for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Input for registering a subscriber
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscriberRequest {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl CreateSubscriberRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Validate for CreateSubscriberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationRules::for_field("url")
            .add(|v, f| NotBlank::validate(v, f, "URL is required"))
            .add(|v, f| {
                Matches::new(&HTTP_URL, "URL must start with http:// or https://").validate(v, f)
            })
            .add(|v, f| {
                MaxLength(MAX_URL_LENGTH).validate_with(v, f, "URL must not exceed 500 characters")
            })
            .check(&self.url);

        if let Some(description) = &self.description {
            errors.extend(
                ValidationRules::for_field("description")
                    .add(|v, f| {
                        MaxLength(MAX_DESCRIPTION_LENGTH).validate_with(
                            v,
                            f,
                            "Description must not exceed 255 characters",
                        )
                    })
                    .check(description),
            );
        }

        errors.into_result()
    }
}

impl From<CreateSubscriberRequest> for NewSubscriber {
    fn from(request: CreateSubscriberRequest) -> Self {
        Self {
            url: request.url,
            description: request.description,
            active: true,
        }
    }
}
