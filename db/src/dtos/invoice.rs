use crate::models::invoice::ServiceItem;

/// Validated invoice fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct InvoiceData {
    pub invoice_number: String,
    pub date: String,
    pub employee_name: String,
    pub employee_id: String,
    pub employee_email: String,
    pub employee_address: String,
    pub employee_mobile: String,
    pub services: Vec<ServiceItem>,
    pub tax_rate: f64,
}
