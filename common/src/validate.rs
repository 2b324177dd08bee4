use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::AppError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Lower-cases and trims an address the way it is stored.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `custom` validator: the value must contain something besides whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// `custom` validator for addresses. Blank values pass, `not_blank` reports those.
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Flattens derive output into readable messages, fields in name order.
/// Items of a list field are prefixed with their 1-based position, so a
/// `services` entry reads `Service 2: ...`.
pub fn messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(errs) => out.extend(errs.iter().map(|err| {
                let message = err
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} is invalid", field));
                format!("{}{}", prefix, message)
            })),
            ValidationErrorsKind::Struct(inner) => collect(inner, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_prefix = format!("{}{} {}: ", prefix, item_label(field), index + 1);
                    collect(inner, &item_prefix, out);
                }
            }
        }
    }
}

fn item_label(field: &str) -> String {
    let singular = field.strip_suffix('s').unwrap_or(field);
    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::BadRequest(messages(&errors).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate, serde::Serialize)]
    struct Line {
        #[validate(custom(function = "not_blank", message = "label is required"))]
        label: String,
        #[validate(range(min = 0.0, message = "amount cannot be negative"))]
        amount: f64,
    }

    #[derive(Validate)]
    struct Order {
        #[validate(
            required(message = "Name is required"),
            custom(function = "not_blank", message = "Name is required")
        )]
        name: Option<String>,
        #[validate(custom(function = "email_address", message = "Email should be valid"))]
        email: Option<String>,
        #[validate(length(min = 1, message = "At least one line is required"), nested)]
        lines: Vec<Line>,
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("jane.doe+billing@example.co.uk"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank(" x ").is_ok());
        assert!(email_address("").is_ok());
        assert!(email_address(" ops@acme.io ").is_ok());
        assert!(email_address("ops").is_err());
    }

    #[test]
    fn flattens_field_and_list_errors_into_one_bad_request() {
        let order = Order {
            name: Some("  ".to_string()),
            email: Some("nope".to_string()),
            lines: vec![
                Line {
                    label: "ok".to_string(),
                    amount: 1.0,
                },
                Line {
                    label: " ".to_string(),
                    amount: -2.0,
                },
            ],
        };

        let err: AppError = order.validate().unwrap_err().into();
        match err {
            AppError::BadRequest(msg) => assert_eq!(
                msg,
                "Email should be valid, Line 2: amount cannot be negative, \
                 Line 2: label is required, Name is required"
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_and_empty_lists() {
        let order = Order {
            name: None,
            email: None,
            lines: Vec::new(),
        };

        let errors = order.validate().unwrap_err();
        assert_eq!(
            messages(&errors),
            vec!["At least one line is required", "Name is required"]
        );
    }
}
