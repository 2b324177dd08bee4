//! Invoice PDF rendering on A4 with the built-in Helvetica faces.

use chrono::NaiveDate;
use common::error::{AppError, Res};
use db::models::{company::CompanyInfo, invoice::Invoice};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;
const TOP: f32 = 282.0;
const BOTTOM: f32 = 25.0;
const ROW: f32 = 6.0;

// services table columns
const X_NO: f32 = LEFT;
const X_DESC: f32 = 25.0;
const X_HOURS: f32 = 120.0;
const X_RATE: f32 = 142.0;
const X_AMOUNT: f32 = 168.0;
const DESC_WRAP: usize = 55;

/// Renders `invoice` with the issuing company's header and bank details.
pub fn render_invoice(invoice: &Invoice, company: Option<&CompanyInfo>) -> Res<Vec<u8>> {
    let title = format!("Invoice {}", invoice.invoice_number);
    let (doc, page, layer) = PdfDocument::new(title.as_str(), Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Pdf(e.to_string()))?;

    let mut w = Writer {
        doc,
        layer,
        font,
        bold,
        y: TOP,
        pages: 1,
    };

    w.header(invoice, company);
    w.bill_to(invoice);
    w.services(invoice);
    w.totals(invoice);
    if let Some(bank) = company.and_then(|c| c.bank_details.as_ref()) {
        w.need(40.0, false);
        w.y -= 6.0;
        w.bold_text("Payment Details", 11.0, LEFT);
        w.y -= ROW;
        w.text(&format!("Bank: {}", bank.bank_name), 10.0, LEFT);
        w.y -= 5.0;
        w.text(&format!("Account Holder: {}", bank.account_holder_name), 10.0, LEFT);
        w.y -= 5.0;
        w.text(&format!("Account Number: {}", bank.account_number), 10.0, LEFT);
        w.y -= 5.0;
        w.text(&format!("IFSC Code: {}", bank.ifsc_code), 10.0, LEFT);
        if let Some(branch) = bank.branch_name.as_deref().filter(|b| !b.trim().is_empty()) {
            w.y -= 5.0;
            let code = bank
                .branch_code
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| format!(" ({})", c))
                .unwrap_or_default();
            w.text(&format!("Branch: {}{}", branch, code), 10.0, LEFT);
        }
    }
    w.footer();

    log::debug!(
        "Rendered invoice #{} on {} page(s)",
        invoice.invoice_number,
        w.pages
    );

    let mut out = std::io::BufWriter::new(Vec::<u8>::new());
    w.doc
        .save(&mut out)
        .map_err(|e| AppError::Pdf(e.to_string()))?;
    out.into_inner()
        .map_err(|e| AppError::Pdf(e.to_string()))
}

struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl Writer {
    fn text(&self, text: &str, size: f32, x: f32) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), &self.font);
    }

    fn bold_text(&self, text: &str, size: f32, x: f32) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), &self.bold);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(LEFT), Mm(self.y)), false),
                (Point::new(Mm(RIGHT), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    /// Starts a new page when less than `height` mm remain. Returns true on a break.
    fn need(&mut self, height: f32, table: bool) -> bool {
        if self.y - height >= BOTTOM {
            return false;
        }
        self.footer();
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.y = TOP;
        if table {
            self.table_header();
        }
        true
    }

    fn header(&mut self, invoice: &Invoice, company: Option<&CompanyInfo>) {
        let name = company.map(|c| c.company_name.as_str()).unwrap_or("");
        self.bold_text(name, 16.0, LEFT);
        self.bold_text("INVOICE", 22.0, 145.0);
        self.y -= 8.0;
        if let Some(c) = company {
            for line in c.company_address.lines().take(4) {
                self.text(line.trim(), 10.0, LEFT);
                self.y -= 5.0;
            }
        }
        let mut right_y = TOP - 10.0;
        for label in [
            format!("Invoice #: {}", invoice.invoice_number),
            format!("Date: {}", format_date(&invoice.date)),
        ] {
            self.layer
                .use_text(label, 11.0, Mm(145.0), Mm(right_y), &self.bold);
            right_y -= 6.0;
        }
        self.y = self.y.min(right_y) - 4.0;
        self.rule();
        self.y -= 10.0;
    }

    fn bill_to(&mut self, invoice: &Invoice) {
        self.bold_text("Bill To:", 12.0, LEFT);
        self.y -= 7.0;
        self.bold_text(&invoice.employee_name, 11.0, LEFT);
        self.y -= 5.0;
        for line in [
            format!("Employee ID: {}", invoice.employee_id),
            invoice.employee_email.clone(),
            invoice.employee_address.clone(),
            format!("Mobile: {}", invoice.employee_mobile),
        ] {
            self.text(&line, 10.0, LEFT);
            self.y -= 5.0;
        }
        self.y -= 6.0;
    }

    fn table_header(&mut self) {
        self.bold_text("#", 10.0, X_NO);
        self.bold_text("Description", 10.0, X_DESC);
        self.bold_text("Hours", 10.0, X_HOURS);
        self.bold_text("Rate", 10.0, X_RATE);
        self.bold_text("Amount", 10.0, X_AMOUNT);
        self.y -= 3.0;
        self.rule();
        self.y -= ROW;
    }

    fn services(&mut self, invoice: &Invoice) {
        self.need(ROW * 3.0, false);
        self.table_header();
        for (idx, item) in invoice.services.iter().enumerate() {
            let lines = wrap(&item.description, DESC_WRAP);
            self.need(ROW * lines.len() as f32, true);
            self.text(&(idx + 1).to_string(), 10.0, X_NO);
            self.text(&format_number(item.hours), 10.0, X_HOURS);
            self.text(&format_number(item.rate), 10.0, X_RATE);
            self.text(&format_number(item.total()), 10.0, X_AMOUNT);
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    self.y -= 4.5;
                }
                self.text(line, 10.0, X_DESC);
            }
            self.y -= ROW;
        }
        self.y += 2.0;
        self.rule();
        self.y -= 8.0;
    }

    fn totals(&mut self, invoice: &Invoice) {
        self.need(ROW * 5.0, false);
        let half = invoice.tax_rate / 2.0;
        let subtotal = invoice.subtotal();
        // tax is split evenly between central and state GST
        let half_tax = invoice.tax_amount() / 2.0;
        let rows = [
            ("Subtotal:".to_string(), subtotal),
            (format!("CGST ({}%):", format_rate(half)), half_tax),
            (format!("SGST ({}%):", format_rate(half)), half_tax),
        ];
        for (label, value) in rows {
            self.text(&label, 10.0, X_RATE - 12.0);
            self.text(&format_number(value), 10.0, X_AMOUNT);
            self.y -= ROW;
        }
        self.bold_text("Grand Total:", 12.0, X_RATE - 12.0);
        self.bold_text(&format_number(invoice.grand_total()), 12.0, X_AMOUNT);
        self.y -= ROW * 2.0;
    }

    fn footer(&self) {
        self.layer.use_text(
            "Thank you for your business.",
            9.0,
            Mm(LEFT),
            Mm(12.0),
            &self.font,
        );
    }
}

/// `Invoice_{number}.pdf`, with characters unsafe in file names replaced by `_`.
pub fn file_name(invoice_number: &str) -> String {
    let safe: String = invoice_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("Invoice_{}.pdf", safe)
}

/// `yyyy-MM-dd` as `MMMM dd, yyyy`. Anything else is returned unchanged.
pub fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// `#,##0.00`
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, dec_part)
}

fn format_rate(rate: f64) -> String {
    let s = format!("{:.2}", rate);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::{company::BankDetails, invoice::ServiceItem};
    use uuid::Uuid;

    use super::*;

    fn invoice(items: usize) -> Invoice {
        let now = Utc::now().naive_utc();
        Invoice {
            id: Uuid::new_v4(),
            invoice_number: "2024-017".into(),
            date: "2024-03-05".into(),
            employee_name: "Priya Nair".into(),
            employee_id: "EMP-9".into(),
            employee_email: "priya@example.com".into(),
            employee_address: "12 Lake Road".into(),
            employee_mobile: "+91 90000 00000".into(),
            services: (0..items)
                .map(|i| ServiceItem {
                    id: Some(i.to_string()),
                    description: format!("Backend development sprint {} with code review", i),
                    hours: 8.0,
                    rate: 1250.0,
                })
                .collect(),
            tax_rate: 18.0,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn company() -> CompanyInfo {
        let now = Utc::now().naive_utc();
        CompanyInfo {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_name: "Acme Labs".into(),
            company_address: "1 Infinite Loop\nBengaluru".into(),
            company_logo: None,
            bank_details: Some(BankDetails {
                bank_name: "State Bank".into(),
                account_number: "000111222".into(),
                account_holder_name: "Acme Labs".into(),
                ifsc_code: "SBIN0000001".into(),
                branch_name: Some("MG Road".into()),
                branch_code: None,
            }),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_invoice(&invoice(3), Some(&company())).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_invoices_span_pages() {
        let short = render_invoice(&invoice(2), None).unwrap();
        let long = render_invoice(&invoice(80), Some(&company())).unwrap();
        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }

    #[test]
    fn dates_and_numbers() {
        assert_eq!(format_date("2024-03-05"), "March 05, 2024");
        assert_eq!(format_date("05/03/2024"), "05/03/2024");
        assert_eq!(format_number(1234567.891), "1,234,567.89");
        assert_eq!(format_number(12.5), "12.50");
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_rate(9.0), "9");
        assert_eq!(format_rate(2.75), "2.75");
    }

    #[test]
    fn file_names_are_path_safe() {
        assert_eq!(file_name("2024-017"), "Invoice_2024-017.pdf");
        assert_eq!(file_name("A/B 1"), "Invoice_A_B_1.pdf");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("", 10), vec![""]);
    }
}
