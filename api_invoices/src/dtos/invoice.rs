use common::{
    error::Res,
    validate::{self, email_address, not_blank},
};
use db::{
    dtos::invoice::InvoiceData,
    models::invoice::{Invoice, ServiceItem},
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItemRequest {
    pub id: Option<String>,
    #[validate(
        required(message = "description is required"),
        custom(function = "not_blank", message = "description is required")
    )]
    pub description: Option<String>,
    #[validate(
        required(message = "hours is required"),
        range(min = 0.0, message = "hours cannot be negative")
    )]
    pub hours: Option<f64>,
    #[validate(
        required(message = "rate is required"),
        range(min = 0.0, message = "rate cannot be negative")
    )]
    pub rate: Option<f64>,
}

/// Body of invoice create and update. Every field is optional here so that
/// missing values are reported together instead of failing deserialization.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    #[validate(
        required(message = "Invoice number is required"),
        custom(function = "not_blank", message = "Invoice number is required")
    )]
    pub invoice_number: Option<String>,
    #[validate(
        required(message = "Date is required"),
        custom(function = "not_blank", message = "Date is required")
    )]
    pub date: Option<String>,
    #[validate(
        required(message = "Employee name is required"),
        custom(function = "not_blank", message = "Employee name is required")
    )]
    pub employee_name: Option<String>,
    #[validate(
        required(message = "Employee ID is required"),
        custom(function = "not_blank", message = "Employee ID is required")
    )]
    pub employee_id: Option<String>,
    #[validate(
        required(message = "Employee email is required"),
        custom(function = "self::employee_email")
    )]
    pub employee_email: Option<String>,
    #[validate(
        required(message = "Employee address is required"),
        custom(function = "not_blank", message = "Employee address is required")
    )]
    pub employee_address: Option<String>,
    #[validate(
        required(message = "Employee mobile is required"),
        custom(function = "not_blank", message = "Employee mobile is required")
    )]
    pub employee_mobile: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one service is required"), nested)]
    pub services: Vec<ServiceItemRequest>,
    #[validate(range(min = 0.0, message = "Tax rate cannot be negative"))]
    pub tax_rate: Option<f64>,
}

fn employee_email(value: &str) -> Result<(), ValidationError> {
    not_blank(value).map_err(|err| err.with_message("Employee email is required".into()))?;
    email_address(value).map_err(|err| err.with_message("Email should be valid".into()))
}

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

impl InvoiceRequest {
    /// Validates every field and returns the data to store, or one `BadRequest`
    /// listing all violations.
    pub fn into_data(self) -> Res<InvoiceData> {
        self.validate()?;

        Ok(InvoiceData {
            invoice_number: trimmed(self.invoice_number),
            date: trimmed(self.date),
            employee_name: trimmed(self.employee_name),
            employee_id: trimmed(self.employee_id),
            employee_email: validate::normalize_email(&self.employee_email.unwrap_or_default()),
            employee_address: trimmed(self.employee_address),
            employee_mobile: trimmed(self.employee_mobile),
            services: self
                .services
                .into_iter()
                .map(|item| ServiceItem {
                    id: item.id,
                    description: trimmed(item.description),
                    hours: item.hours.unwrap_or_default(),
                    rate: item.rate.unwrap_or_default(),
                })
                .collect(),
            tax_rate: self.tax_rate.unwrap_or(0.0),
        })
    }
}

/// Stored invoice plus its computed totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        InvoiceResponse {
            subtotal: invoice.subtotal(),
            tax_amount: invoice.tax_amount(),
            grand_total: invoice.grand_total(),
            invoice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::AppError;

    fn request() -> InvoiceRequest {
        InvoiceRequest {
            invoice_number: Some(" INV-1 ".to_string()),
            date: Some("2024-06-30".to_string()),
            employee_name: Some("Ravi Kumar".to_string()),
            employee_id: Some("E-7".to_string()),
            employee_email: Some("Ravi@Example.com".to_string()),
            employee_address: Some("9 Hill St".to_string()),
            employee_mobile: Some("9999".to_string()),
            services: vec![ServiceItemRequest {
                id: Some("row-1".to_string()),
                description: Some("Design".to_string()),
                hours: Some(2.0),
                rate: Some(100.0),
            }],
            tax_rate: Some(18.0),
        }
    }

    #[test]
    fn normalizes_a_valid_request() {
        let data = request().into_data().unwrap();
        assert_eq!(data.invoice_number, "INV-1");
        assert_eq!(data.employee_email, "ravi@example.com");
        assert_eq!(data.services[0].id.as_deref(), Some("row-1"));
    }

    #[test]
    fn missing_tax_rate_means_no_tax() {
        let data = InvoiceRequest {
            tax_rate: None,
            ..request()
        }
        .into_data()
        .unwrap();
        assert_eq!(data.tax_rate, 0.0);
    }

    #[test]
    fn collects_all_violations() {
        let req = InvoiceRequest {
            employee_email: Some("nope".to_string()),
            services: vec![ServiceItemRequest {
                description: Some(" ".to_string()),
                hours: Some(-1.0),
                ..Default::default()
            }],
            tax_rate: Some(-5.0),
            ..request()
        };

        let Err(AppError::BadRequest(message)) = req.into_data() else {
            panic!("expected bad request");
        };
        assert_eq!(
            message,
            "Email should be valid, Service 1: description is required, \
             Service 1: hours cannot be negative, Service 1: rate is required, \
             Tax rate cannot be negative"
        );
    }

    #[test]
    fn empty_services_are_rejected() {
        let req = InvoiceRequest {
            services: Vec::new(),
            ..request()
        };
        assert!(matches!(req.into_data(), Err(AppError::BadRequest(m)) if m == "At least one service is required"));
    }

    #[test]
    fn blank_email_is_reported_once() {
        let req = InvoiceRequest {
            employee_email: Some("   ".to_string()),
            ..request()
        };
        assert!(matches!(req.into_data(), Err(AppError::BadRequest(m)) if m == "Employee email is required"));
    }
}
