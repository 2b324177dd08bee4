use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use common::{env_config::EmailConfig, error::Res, validate};
use db::models::{company::CompanyInfo, invoice::Invoice};
use storage::FileStorage;

use crate::{
    brevo::{Attachment, BrevoClient, EmailPayload, Recipient, Sender},
    error::{DispatchError, SendFailure},
    policy::RetryPolicy,
    templates,
};

/// Largest PDF the provider accepts as an attachment.
pub const MAX_PDF_SIZE_BYTES: usize = 9 * 1024 * 1024;

/// Lifecycle of one dispatch. Only logged, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchState {
    Pending,
    Attempting(u32),
    Sent,
    Failed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Pending => write!(f, "pending"),
            DispatchState::Attempting(n) => write!(f, "attempting({})", n),
            DispatchState::Sent => write!(f, "sent"),
            DispatchState::Failed => write!(f, "failed"),
        }
    }
}

/// How the invoice reached the recipient.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Attached {
        message_id: Option<String>,
        attempts: u32,
    },
    /// The PDF was too large and was stored; the email carries `url`.
    Link {
        url: String,
        message_id: Option<String>,
        attempts: u32,
    },
}

pub struct Dispatcher {
    client: BrevoClient,
    sender: Sender,
    policy: RetryPolicy,
    storage: Arc<FileStorage>,
    app_base_url: String,
}

impl Dispatcher {
    pub fn new(config: &EmailConfig, storage: Arc<FileStorage>, app_base_url: &str) -> Res<Self> {
        Ok(Self {
            client: BrevoClient::new(config)?,
            sender: Sender {
                name: config.sender_name.clone(),
                email: config.sender_email.clone(),
            },
            policy: RetryPolicy::linear(config.max_retries, config.retry_delay),
            storage,
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Invoice number and recipient address checks, usable before a PDF exists.
    pub fn validate_recipient(invoice: &Invoice) -> Result<(), DispatchError> {
        if invoice.invoice_number.trim().is_empty() {
            return Err(DispatchError::Validation(
                "Invoice number is required".to_string(),
            ));
        }
        if !validate::is_valid_email(invoice.employee_email.trim()) {
            return Err(DispatchError::Validation(format!(
                "Invalid recipient email address: {}",
                invoice.employee_email
            )));
        }
        Ok(())
    }

    /// Checks everything that can be rejected before any network traffic.
    pub fn validate(invoice: &Invoice, pdf: &[u8]) -> Result<(), DispatchError> {
        Self::validate_recipient(invoice)?;
        if pdf.is_empty() {
            return Err(DispatchError::Validation("PDF content is empty".to_string()));
        }
        Ok(())
    }

    /// Renders the invoice and sends it.
    pub async fn send_invoice(
        &self,
        invoice: &Invoice,
        company: Option<&CompanyInfo>,
    ) -> Result<Delivery, DispatchError> {
        let pdf = pdf::render_invoice(invoice, company)
            .map_err(|e| DispatchError::Pdf(e.to_string()))?;
        self.send_with_pdf(invoice, company, pdf).await
    }

    /// Sends `pdf` as an attachment, or as a download link when it exceeds
    /// [`MAX_PDF_SIZE_BYTES`].
    pub async fn send_with_pdf(
        &self,
        invoice: &Invoice,
        company: Option<&CompanyInfo>,
        pdf: Vec<u8>,
    ) -> Result<Delivery, DispatchError> {
        Self::validate(invoice, &pdf)?;

        let mut pdf = pdf;
        if pdf.len() > MAX_PDF_SIZE_BYTES {
            log::warn!(
                "Invoice #{} PDF is {} bytes, above the {} byte limit",
                invoice.invoice_number,
                pdf.len(),
                MAX_PDF_SIZE_BYTES
            );
            pdf = compress_pdf(pdf);
        }

        if pdf.len() > MAX_PDF_SIZE_BYTES {
            return self.send_download_link(invoice, &pdf).await;
        }

        let payload = EmailPayload {
            sender: self.sender.clone(),
            to: vec![recipient(invoice)],
            subject: templates::invoice_subject(invoice, company),
            html_content: templates::invoice_body(invoice, company),
            attachment: Some(vec![Attachment {
                name: pdf::file_name(&invoice.invoice_number),
                content: STANDARD.encode(&pdf),
            }]),
        };
        let (message_id, attempts) = self.deliver(&invoice.invoice_number, &payload).await?;
        Ok(Delivery::Attached {
            message_id,
            attempts,
        })
    }

    async fn send_download_link(
        &self,
        invoice: &Invoice,
        pdf: &[u8],
    ) -> Result<Delivery, DispatchError> {
        let name = format!(
            "{}_{}.pdf",
            pdf::file_name(&invoice.invoice_number).trim_end_matches(".pdf"),
            chrono::Utc::now().timestamp_millis()
        );
        let reference = self
            .storage
            .store_named(pdf, &name)
            .await
            .map_err(|e| DispatchError::Storage(e.to_string()))?;
        let url = format!("{}{}", self.app_base_url, reference);
        log::info!(
            "Invoice #{} stored at {} for link delivery",
            invoice.invoice_number,
            reference
        );

        let payload = EmailPayload {
            sender: self.sender.clone(),
            to: vec![recipient(invoice)],
            subject: templates::download_subject(invoice),
            html_content: templates::download_body(invoice, &url),
            attachment: None,
        };
        let (message_id, attempts) = self.deliver(&invoice.invoice_number, &payload).await?;
        Ok(Delivery::Link {
            url,
            message_id,
            attempts,
        })
    }

    /// Runs the attempt sequence. Sleeps only between attempts.
    async fn deliver(
        &self,
        invoice_number: &str,
        payload: &EmailPayload,
    ) -> Result<(Option<String>, u32), DispatchError> {
        let mut state = DispatchState::Pending;
        let mut attempt = 0;
        log::debug!("Invoice #{} dispatch {}", invoice_number, state);

        loop {
            attempt += 1;
            state = DispatchState::Attempting(attempt);
            log::debug!("Invoice #{} dispatch {}", invoice_number, state);

            let failure = match self.client.send(payload).await {
                Ok(message_id) => {
                    state = DispatchState::Sent;
                    log::info!(
                        "Invoice #{} dispatch {} on attempt {} (messageId={})",
                        invoice_number,
                        state,
                        attempt,
                        message_id.as_deref().unwrap_or("-")
                    );
                    return Ok((message_id, attempt));
                }
                Err(failure) => failure,
            };

            if !self.policy.has_next(attempt) {
                state = DispatchState::Failed;
                log::error!(
                    "Invoice #{} dispatch {} after {} attempts: {}",
                    invoice_number,
                    state,
                    attempt,
                    failure
                );
                return Err(DispatchError::Exhausted {
                    invoice_number: invoice_number.to_string(),
                    attempts: attempt,
                    last: failure,
                });
            }

            let delay = self.policy.delay_for(attempt);
            match failure {
                SendFailure::InvalidApiKey => log::error!(
                    "Invoice #{} attempt {} rejected: {}",
                    invoice_number,
                    attempt,
                    failure
                ),
                _ => log::warn!(
                    "Invoice #{} attempt {} failed: {}. Retrying in {}ms",
                    invoice_number,
                    attempt,
                    failure,
                    delay.as_millis()
                ),
            }
            tokio::time::sleep(delay).await;
        }
    }
}

fn recipient(invoice: &Invoice) -> Recipient {
    let name = invoice.employee_name.trim();
    Recipient {
        email: invoice.employee_email.trim().to_string(),
        name: if name.is_empty() {
            "Valued Customer".to_string()
        } else {
            name.to_string()
        },
    }
}

/// Identity for now: oversized PDFs always take the download-link path.
pub fn compress_pdf(pdf: Vec<u8>) -> Vec<u8> {
    pdf
}
