use std::fmt::Write;

use db::models::{company::CompanyInfo, invoice::Invoice};

pub fn invoice_subject(invoice: &Invoice, company: Option<&CompanyInfo>) -> String {
    let name = company
        .map(|c| c.company_name.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or("Your Invoice");
    format!("Invoice #{} - {}", invoice.invoice_number, name)
}

pub fn download_subject(invoice: &Invoice) -> String {
    format!("Invoice #{} - Download Link", invoice.invoice_number)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn greeting(invoice: &Invoice) -> String {
    let name = invoice.employee_name.trim();
    escape_html(if name.is_empty() { "Valued Customer" } else { name })
}

/// Body of the regular email, sent together with the PDF attachment.
pub fn invoice_body(invoice: &Invoice, company: Option<&CompanyInfo>) -> String {
    let mut rows = String::new();
    for item in &invoice.services {
        // writing to a String cannot fail
        let _ = write!(
            rows,
            "<tr><td>{}</td><td style=\"text-align:right\">{:.2}</td>\
             <td style=\"text-align:right\">{:.2}</td><td style=\"text-align:right\">{:.2}</td></tr>",
            escape_html(&item.description),
            item.hours,
            item.rate,
            item.total()
        );
    }

    let mut totals = format!(
        "<tr><td colspan=\"3\" style=\"text-align:right\"><strong>Subtotal</strong></td>\
         <td style=\"text-align:right\">{:.2}</td></tr>",
        invoice.subtotal()
    );
    if invoice.tax_rate > 0.0 {
        let _ = write!(
            totals,
            "<tr><td colspan=\"3\" style=\"text-align:right\">Tax ({:.2}%)</td>\
             <td style=\"text-align:right\">{:.2}</td></tr>\
             <tr><td colspan=\"3\" style=\"text-align:right\"><strong>Grand Total</strong></td>\
             <td style=\"text-align:right\"><strong>{:.2}</strong></td></tr>",
            invoice.tax_rate,
            invoice.tax_amount(),
            invoice.grand_total()
        );
    }

    let company_name = company
        .map(|c| escape_html(&c.company_name))
        .unwrap_or_default();

    format!(
        "<html><body style=\"font-family:Arial,sans-serif;color:#333\">\
         <p>Dear {greeting},</p>\
         <p>Please find attached invoice <strong>#{number}</strong> dated {date}.</p>\
         <table cellpadding=\"6\" style=\"border-collapse:collapse;width:100%\" border=\"1\">\
         <thead><tr><th>Description</th><th>Hours</th><th>Rate</th><th>Total</th></tr></thead>\
         <tbody>{rows}{totals}</tbody></table>\
         {payment}\
         <p>Thank you for your business.</p>\
         <p>Regards,<br/>{company_name}</p>\
         </body></html>",
        greeting = greeting(invoice),
        number = escape_html(&invoice.invoice_number),
        date = escape_html(&invoice.date),
        payment = payment_instructions(company),
    )
}

fn payment_instructions(company: Option<&CompanyInfo>) -> String {
    let Some(bank) = company.and_then(|c| c.bank_details.as_ref()) else {
        return String::new();
    };
    let mut html = format!(
        "<h3>Payment Instructions</h3><p>\
         Bank Name: {}<br/>Account Holder: {}<br/>Account Number: {}<br/>IFSC Code: {}",
        escape_html(&bank.bank_name),
        escape_html(&bank.account_holder_name),
        escape_html(&bank.account_number),
        escape_html(&bank.ifsc_code),
    );
    if let Some(branch) = bank.branch_name.as_deref().filter(|b| !b.trim().is_empty()) {
        let _ = write!(html, "<br/>Branch: {}", escape_html(branch));
    }
    if let Some(code) = bank.branch_code.as_deref().filter(|c| !c.trim().is_empty()) {
        let _ = write!(html, "<br/>Branch Code: {}", escape_html(code));
    }
    html.push_str("</p>");
    html
}

/// Body of the fallback email used when the PDF is too large to attach.
pub fn download_body(invoice: &Invoice, link: &str) -> String {
    format!(
        "<html><body style=\"font-family:Arial,sans-serif;color:#333\">\
         <h2>Your Invoice is Ready</h2>\
         <p>Dear {greeting},</p>\
         <p>Invoice <strong>#{number}</strong> is too large to attach to this email.</p>\
         <p><a href=\"{link}\">Download your invoice</a></p>\
         <p>This link is valid for 7 days.</p>\
         <p>Thank you for your business.</p>\
         </body></html>",
        greeting = greeting(invoice),
        number = escape_html(&invoice.invoice_number),
        link = escape_html(link),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
