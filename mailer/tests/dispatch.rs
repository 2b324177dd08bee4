use std::{sync::Arc, time::Duration};

use chrono::Utc;
use common::env_config::EmailConfig;
use db::models::{
    company::{BankDetails, CompanyInfo},
    invoice::{Invoice, ServiceItem},
};
use mailer::{
    Delivery, DispatchError, Dispatcher, MAX_PDF_SIZE_BYTES, RetryPolicy, SendFailure,
};
use serde_json::{Value, json};
use storage::FileStorage;
use tempfile::tempdir;
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn email_config(api_url: &str) -> EmailConfig {
    EmailConfig {
        api_key: "test-key".to_string(),
        api_url: api_url.to_string(),
        sender_email: "billing@acme.io".to_string(),
        sender_name: "Invoice System".to_string(),
        max_retries: 3,
        retry_delay: Duration::from_millis(5),
    }
}

fn invoice(email: &str) -> Invoice {
    let now = Utc::now().naive_utc();
    Invoice {
        id: Uuid::new_v4(),
        invoice_number: "INV-42".to_string(),
        date: "2024-06-30".to_string(),
        employee_name: "Ravi Kumar".to_string(),
        employee_id: "E-7".to_string(),
        employee_email: email.to_string(),
        employee_address: "9 Hill St".to_string(),
        employee_mobile: "9999".to_string(),
        services: vec![ServiceItem {
            id: None,
            description: "Design <review>".to_string(),
            hours: 4.0,
            rate: 50.0,
        }],
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
        company_name: "Acme Labs".to_string(),
        company_address: "1 Loop".to_string(),
        company_logo: None,
        bank_details: Some(BankDetails {
            bank_name: "State Bank".to_string(),
            account_number: "123456".to_string(),
            account_holder_name: "Acme Labs".to_string(),
            ifsc_code: "SBIN0001".to_string(),
            branch_name: None,
            branch_code: None,
        }),
        created_at: now,
        updated_at: now,
    }
}

async fn dispatcher(server: &MockServer, dir: &std::path::Path) -> Dispatcher {
    let storage = Arc::new(FileStorage::new(dir).await.unwrap());
    Dispatcher::new(
        &email_config(&server.uri()),
        storage,
        "https://invoices.acme.io",
    )
    .unwrap()
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}

#[tokio::test]
async fn succeeds_on_third_attempt_after_two_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(500).set_body_string("temporarily down"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<m-1>" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path()).await;
    let delivery = dispatcher
        .send_with_pdf(&invoice("ravi@example.com"), Some(&company()), b"%PDF-1.7 tiny".to_vec())
        .await
        .unwrap();

    assert_eq!(
        delivery,
        Delivery::Attached {
            message_id: Some("<m-1>".to_string()),
            attempts: 3,
        }
    );

    let bodies = sent_bodies(&server).await;
    assert_eq!(bodies.len(), 3);
    let last = &bodies[2];
    assert_eq!(last["to"][0]["email"], "ravi@example.com");
    assert_eq!(last["to"][0]["name"], "Ravi Kumar");
    assert_eq!(last["sender"]["email"], "billing@acme.io");
    assert_eq!(last["subject"], "Invoice #INV-42 - Acme Labs");
    assert_eq!(last["attachment"][0]["name"], "Invoice_INV-42.pdf");
    assert_eq!(last["attachment"][0]["content"], "JVBERi0xLjcgdGlueQ==");
    let html = last["htmlContent"].as_str().unwrap();
    assert!(html.contains("Design &lt;review&gt;"));
    assert!(html.contains("SBIN0001"));
    assert!(html.contains("236.00"));
}

#[tokio::test]
async fn oversized_pdf_falls_back_to_download_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<m-2>" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path()).await;
    let pdf = vec![b'x'; MAX_PDF_SIZE_BYTES + 1];
    let delivery = dispatcher
        .send_with_pdf(&invoice("ravi@example.com"), None, pdf)
        .await
        .unwrap();

    let Delivery::Link { url, attempts, .. } = delivery else {
        panic!("expected link delivery, got {:?}", delivery);
    };
    assert_eq!(attempts, 1);
    assert!(url.starts_with("https://invoices.acme.io/uploads/Invoice_INV-42_"));

    let stored = url.rsplit('/').next().unwrap();
    let on_disk = std::fs::metadata(dir.path().join(stored)).unwrap();
    assert_eq!(on_disk.len() as usize, MAX_PDF_SIZE_BYTES + 1);

    let bodies = sent_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].get("attachment").is_none());
    assert_eq!(bodies[0]["subject"], "Invoice #INV-42 - Download Link");
    assert!(bodies[0]["htmlContent"].as_str().unwrap().contains(&url));
}

#[tokio::test]
async fn pdf_at_the_limit_is_still_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path()).await;
    let delivery = dispatcher
        .send_with_pdf(&invoice("ravi@example.com"), None, vec![0u8; MAX_PDF_SIZE_BYTES])
        .await
        .unwrap();
    assert!(matches!(delivery, Delivery::Attached { message_id: None, attempts: 1 }));
}

#[tokio::test]
async fn invalid_api_key_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "code": "unauthorized" })))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path()).await;
    let err = dispatcher
        .send_with_pdf(&invoice("ravi@example.com"), None, b"%PDF".to_vec())
        .await
        .unwrap_err();

    match &err {
        DispatchError::Exhausted {
            invoice_number,
            attempts,
            last,
        } => {
            assert_eq!(invoice_number, "INV-42");
            assert_eq!(*attempts, 3);
            assert_eq!(*last, SendFailure::InvalidApiKey);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Failed to send invoice #INV-42 after 3 attempts: Invalid Brevo API key. Please check your configuration."
    );
}

#[tokio::test]
async fn rate_limit_and_upstream_failures_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad sender"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path())
        .await
        .with_policy(RetryPolicy::linear(2, Duration::from_millis(1)));
    let err = dispatcher
        .send_with_pdf(&invoice("ravi@example.com"), None, b"%PDF".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Exhausted {
            attempts: 2,
            last: SendFailure::Upstream { status: 400, .. },
            ..
        }
    ));
    assert!(err.to_string().ends_with("status 400 : bad sender"));
}

#[tokio::test]
async fn malformed_recipient_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path()).await;

    let err = dispatcher
        .send_with_pdf(&invoice("not-an-address"), None, b"%PDF".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));

    let err = dispatcher
        .send_with_pdf(&invoice("ravi@example.com"), None, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)));
}

#[tokio::test]
async fn renders_pdf_when_none_is_supplied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<m-3>" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let dispatcher = dispatcher(&server, dir.path()).await;
    dispatcher
        .send_invoice(&invoice("ravi@example.com"), Some(&company()))
        .await
        .unwrap();

    let bodies = sent_bodies(&server).await;
    let content = bodies[0]["attachment"][0]["content"].as_str().unwrap();
    // base64 of "%PDF"
    assert!(content.starts_with("JVBER"));
}
