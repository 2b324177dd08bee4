//! Delivery of invoice PDFs through the Brevo transactional email API.
//!
//! A dispatch validates its input, picks attachment or download-link delivery
//! based on the PDF size, then runs a bounded sequence of attempts driven by a
//! [`RetryPolicy`]. Exhaustion surfaces the last provider failure to the caller.

pub mod brevo;
pub mod dispatcher;
pub mod error;
pub mod policy;
pub mod templates;

pub use dispatcher::{Delivery, DispatchState, Dispatcher, MAX_PDF_SIZE_BYTES, compress_pdf};
pub use error::{DispatchError, SendFailure};
pub use policy::{Backoff, RetryPolicy};
