// Payment request validation

use crate::CreatePaymentRequest;
use once_cell::sync::Lazy;
use paywire_validation::{
    Matches, MaxLength, NotBlank, Validate, ValidationErrors, ValidationRules,
};
use regex::Regex;

pub const MAX_NAME_LENGTH: usize = 100;

static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());
static ZIP_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").unwrap());
static CARD_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13,19}$").unwrap());

const NAME_CHARACTERS: &str = "must contain only letters, spaces, hyphens, and apostrophes";

fn name_rules(field: &'static str, label: &'static str) -> ValidationRules {
    ValidationRules::for_field(field)
        .add(move |v, f| NotBlank::validate(v, f, &format!("{} is required", label)))
        .add(move |v, f| {
            let message = format!("{} must not exceed {} characters", label, MAX_NAME_LENGTH);
            MaxLength(MAX_NAME_LENGTH).validate_with(v, f, &message)
        })
        .add(move |v, f| {
            let message = format!("{} {}", label, NAME_CHARACTERS);
            Matches::new(&NAME, &message).validate(v, f)
        })
}

static FIRST_NAME: Lazy<ValidationRules> = Lazy::new(|| name_rules("firstName", "First name"));
static LAST_NAME: Lazy<ValidationRules> = Lazy::new(|| name_rules("lastName", "Last name"));

static ZIP: Lazy<ValidationRules> = Lazy::new(|| {
    ValidationRules::for_field("zipCode")
        .add(|v, f| NotBlank::validate(v, f, "Zip code is required"))
        .add(|v, f| {
            Matches::new(
                &ZIP_CODE,
                "Zip code must be 5 digits (e.g., 12345) or 5+4 format (e.g., 12345-6789)",
            )
            .validate(v, f)
        })
});

// Messages never include the submitted number
static CARD: Lazy<ValidationRules> = Lazy::new(|| {
    ValidationRules::for_field("cardNumber")
        .add(|v, f| NotBlank::validate(v, f, "Card number is required"))
        .add(|v, f| {
            Matches::new(&CARD_NUMBER, "Card number: digits only, length 13-19.").validate(v, f)
        })
});

impl Validate for CreatePaymentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = FIRST_NAME.check(&self.first_name);
        errors.extend(LAST_NAME.check(&self.last_name));
        errors.extend(ZIP.check(&self.zip_code));
        errors.extend(CARD.check(&self.card_number));
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD_NUMBER_VALUE: &str = "4532015112830366";

    fn valid() -> CreatePaymentRequest {
        CreatePaymentRequest::new("John", "Doe", "12345", CARD_NUMBER_VALUE)
    }

    #[test]
    fn test_valid_request() {
        assert!(valid().validate().is_ok());

        let request =
            CreatePaymentRequest::new("Mary-Jane", "O'Brien Smith", "12345-6789", "4111111111111");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_name_characters() {
        let request = CreatePaymentRequest {
            first_name: "J0hn".to_string(),
            ..valid()
        };
        let errors = request.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.errors[0].to_string(),
            "firstName: First name must contain only letters, spaces, hyphens, and apostrophes"
        );
    }

    #[test]
    fn test_name_length() {
        let request = CreatePaymentRequest {
            last_name: "a".repeat(MAX_NAME_LENGTH + 1),
            ..valid()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(
            errors.errors[0].message,
            "Last name must not exceed 100 characters"
        );

        let request = CreatePaymentRequest {
            last_name: "a".repeat(MAX_NAME_LENGTH),
            ..valid()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zip_formats() {
        for zip in ["1234", "123456", "12345-678", "abcde", "12345 6789"] {
            let request = CreatePaymentRequest {
                zip_code: zip.to_string(),
                ..valid()
            };
            assert!(request.validate().is_err(), "{} should be rejected", zip);
        }
    }

    #[test]
    fn test_card_number_rules_do_not_echo_value() {
        for card in ["453201511283", "45320151128303661234", "4532-0151-1283-0366"] {
            let request = CreatePaymentRequest {
                card_number: card.to_string(),
                ..valid()
            };
            let errors = request.validate().unwrap_err();

            assert_eq!(errors.field_errors("cardNumber").len(), 1);
            assert!(!errors.to_string().contains("4532"));
        }
    }

    #[test]
    fn test_collects_every_field() {
        let errors = CreatePaymentRequest::default().validate().unwrap_err();

        for field in ["firstName", "lastName", "zipCode", "cardNumber"] {
            assert!(!errors.field_errors(field).is_empty(), "{} missing", field);
        }
        assert_eq!(errors.errors[0].message, "First name is required");
    }
}
