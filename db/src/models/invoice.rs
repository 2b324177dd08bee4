use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    /// Client-side row id, kept verbatim.
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    pub hours: f64,
    pub rate: f64,
}

impl ServiceItem {
    pub fn total(&self) -> f64 {
        self.hours * self.rate
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    /// `yyyy-MM-dd`, kept as entered.
    pub date: String,
    pub employee_name: String,
    pub employee_id: String,
    pub employee_email: String,
    pub employee_address: String,
    pub employee_mobile: String,
    pub services: Vec<ServiceItem>,
    /// Percent, e.g. `18.0`.
    pub tax_rate: f64,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Totals are always derived from the line items and never stored.
impl Invoice {
    pub fn subtotal(&self) -> f64 {
        self.services.iter().map(ServiceItem::total).sum()
    }

    pub fn tax_amount(&self) -> f64 {
        self.subtotal() * self.tax_rate / 100.0
    }

    pub fn grand_total(&self) -> f64 {
        self.subtotal() + self.tax_amount()
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub date: String,
    pub employee_name: String,
    pub employee_id: String,
    pub employee_email: String,
    pub employee_address: String,
    pub employee_mobile: String,
    pub services: Json<Vec<ServiceItem>>,
    pub tax_rate: f64,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            invoice_number: row.invoice_number,
            date: row.date,
            employee_name: row.employee_name,
            employee_id: row.employee_id,
            employee_email: row.employee_email,
            employee_address: row.employee_address,
            employee_mobile: row.employee_mobile,
            services: row.services.0,
            tax_rate: row.tax_rate,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn invoice(services: Vec<(f64, f64)>, tax_rate: f64) -> Invoice {
        let now = Utc::now().naive_utc();
        Invoice {
            id: Uuid::new_v4(),
            invoice_number: "INV-1".into(),
            date: "2024-03-01".into(),
            employee_name: "Jane".into(),
            employee_id: "E1".into(),
            employee_email: "jane@example.com".into(),
            employee_address: "1 Main St".into(),
            employee_mobile: "555".into(),
            services: services
                .into_iter()
                .map(|(hours, rate)| ServiceItem {
                    id: None,
                    description: "Work".into(),
                    hours,
                    rate,
                })
                .collect(),
            tax_rate,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(1.0)
    }

    #[test]
    fn totals_follow_line_items() {
        let cases = [
            (vec![], 18.0),
            (vec![(1.0, 100.0)], 0.0),
            (vec![(2.5, 40.0), (10.0, 12.75), (0.0, 999.0)], 18.0),
            (vec![(0.1, 0.2), (0.3, 0.7), (1e3, 1e-3)], 5.5),
            (vec![(160.0, 87.5); 12], 12.0),
        ];
        for (items, rate) in cases {
            let inv = invoice(items.clone(), rate);
            let expected_sub: f64 = items.iter().map(|(h, r)| h * r).sum();
            let expected_tax = expected_sub * rate / 100.0;
            assert!(close(inv.subtotal(), expected_sub));
            assert!(close(inv.tax_amount(), expected_tax));
            assert!(close(inv.grand_total(), expected_sub + expected_tax));
        }
    }

    #[test]
    fn editing_items_changes_totals() {
        let mut inv = invoice(vec![(1.0, 50.0)], 10.0);
        assert!(close(inv.grand_total(), 55.0));
        inv.services[0].hours = 3.0;
        assert!(close(inv.grand_total(), 165.0));
    }
}
