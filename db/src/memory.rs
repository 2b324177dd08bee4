use async_trait::async_trait;
use chrono::Utc;
use common::error::{AppError, Res};
use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;

use crate::{
    dtos::{
        company::{CompanyCreateRequest, CompanyUpdateRequest},
        invoice::InvoiceData,
        user::UserCreateRequest,
    },
    models::{
        company::CompanyInfo,
        invoice::Invoice,
        user::{AuthCredentials, User},
    },
    store::{CompanyStore, InvoiceStore, UserStore},
};

/// Process-local store used by tests and by `DATABASE_URL=memory://`.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    // email -> user id, doubles as the uniqueness index
    emails: DashMap<String, Uuid>,
    credentials: DashMap<Uuid, AuthCredentials>,
    companies: DashMap<Uuid, CompanyInfo>,
    invoices: DashMap<Uuid, Invoice>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut invoices: Vec<Invoice>) -> Vec<Invoice> {
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        invoices
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn exists_user_by_email(&self, email: &str) -> Res<bool> {
        Ok(self.emails.contains_key(email))
    }

    async fn count_users(&self) -> Res<i64> {
        Ok(self.users.len() as i64)
    }

    async fn insert_user_with_credentials(&self, data: UserCreateRequest) -> Res<User> {
        let id = match self.emails.entry(data.email.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::BadRequest("Email already registered".to_string()));
            }
            Entry::Vacant(slot) => *slot.insert(Uuid::new_v4()),
        };
        let now = Utc::now().naive_utc();
        let user = User {
            id,
            email: data.email,
            name: data.name,
            company_info_id: None,
            created_at: now,
            updated_at: now,
        };
        self.credentials.insert(
            id,
            AuthCredentials {
                user_id: id,
                password_hash: data.password_hash,
            },
        );
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Res<Option<User>> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }

    async fn get_user_with_password_hash(
        &self,
        email: &str,
    ) -> Res<Option<(User, AuthCredentials)>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        let user = self.users.get(&id).map(|u| u.clone());
        let credentials = self.credentials.get(&id).map(|c| c.clone());
        Ok(user.zip(credentials))
    }

    async fn set_company_info_id(&self, user_id: Uuid, company_info_id: Uuid) -> Res<()> {
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.company_info_id = Some(company_info_id);
            user.updated_at = Utc::now().naive_utc();
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Res<bool> {
        let Some((_, user)) = self.users.remove(&user_id) else {
            return Ok(false);
        };
        self.emails.remove(&user.email);
        self.credentials.remove(&user_id);
        self.companies.retain(|_, c| c.user_id != user_id);
        self.invoices.retain(|_, i| i.created_by != user_id);
        Ok(true)
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert_company_info(&self, data: CompanyCreateRequest) -> Res<CompanyInfo> {
        let now = Utc::now().naive_utc();
        let info = CompanyInfo {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            company_name: data.company_name,
            company_address: data.company_address,
            company_logo: data.company_logo,
            bank_details: data.bank_details,
            created_at: now,
            updated_at: now,
        };
        self.companies.insert(info.id, info.clone());
        Ok(info)
    }

    async fn get_company_info_by_user(&self, user_id: Uuid) -> Res<Option<CompanyInfo>> {
        Ok(self
            .companies
            .iter()
            .find(|c| c.user_id == user_id)
            .map(|c| c.clone()))
    }

    async fn update_company_info(
        &self,
        user_id: Uuid,
        data: CompanyUpdateRequest,
    ) -> Res<Option<CompanyInfo>> {
        let Some(mut info) = self.companies.iter_mut().find(|c| c.user_id == user_id) else {
            return Ok(None);
        };
        info.company_name = data.company_name;
        info.company_address = data.company_address;
        if data.company_logo.is_some() {
            info.company_logo = data.company_logo;
        }
        info.bank_details = data.bank_details;
        info.updated_at = Utc::now().naive_utc();
        Ok(Some(info.clone()))
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn insert_invoice(&self, created_by: Uuid, data: InvoiceData) -> Res<Invoice> {
        let now = Utc::now().naive_utc();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            invoice_number: data.invoice_number,
            date: data.date,
            employee_name: data.employee_name,
            employee_id: data.employee_id,
            employee_email: data.employee_email,
            employee_address: data.employee_address,
            employee_mobile: data.employee_mobile,
            services: data.services,
            tax_rate: data.tax_rate,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, owner: Uuid, invoice_id: Uuid) -> Res<Option<Invoice>> {
        Ok(self
            .invoices
            .get(&invoice_id)
            .filter(|i| i.created_by == owner)
            .map(|i| i.clone()))
    }

    async fn list_invoices(&self, owner: Uuid) -> Res<Vec<Invoice>> {
        Ok(Self::newest_first(
            self.invoices
                .iter()
                .filter(|i| i.created_by == owner)
                .map(|i| i.clone())
                .collect(),
        ))
    }

    async fn list_invoices_by_employee(
        &self,
        owner: Uuid,
        employee_id: &str,
    ) -> Res<Vec<Invoice>> {
        Ok(Self::newest_first(
            self.invoices
                .iter()
                .filter(|i| i.created_by == owner && i.employee_id == employee_id)
                .map(|i| i.clone())
                .collect(),
        ))
    }

    async fn update_invoice(
        &self,
        owner: Uuid,
        invoice_id: Uuid,
        data: InvoiceData,
    ) -> Res<Option<Invoice>> {
        let Some(mut invoice) = self
            .invoices
            .get_mut(&invoice_id)
            .filter(|i| i.created_by == owner)
        else {
            return Ok(None);
        };
        invoice.invoice_number = data.invoice_number;
        invoice.date = data.date;
        invoice.employee_name = data.employee_name;
        invoice.employee_id = data.employee_id;
        invoice.employee_email = data.employee_email;
        invoice.employee_address = data.employee_address;
        invoice.employee_mobile = data.employee_mobile;
        invoice.services = data.services;
        invoice.tax_rate = data.tax_rate;
        invoice.updated_at = Utc::now().naive_utc();
        Ok(Some(invoice.clone()))
    }

    async fn delete_invoice(&self, owner: Uuid, invoice_id: Uuid) -> Res<bool> {
        Ok(self
            .invoices
            .remove_if(&invoice_id, |_, i| i.created_by == owner)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::ServiceItem;

    fn data(number: &str, employee: &str) -> InvoiceData {
        InvoiceData {
            invoice_number: number.to_string(),
            date: "2024-05-01".to_string(),
            employee_name: "Sam".to_string(),
            employee_id: employee.to_string(),
            employee_email: "sam@example.com".to_string(),
            employee_address: "2 Side St".to_string(),
            employee_mobile: "123".to_string(),
            services: vec![ServiceItem {
                id: None,
                description: "Consulting".to_string(),
                hours: 3.0,
                rate: 20.0,
            }],
            tax_rate: 18.0,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let req = |email: &str| UserCreateRequest {
            email: email.to_string(),
            name: "A".to_string(),
            password_hash: "h".to_string(),
        };
        store.insert_user_with_credentials(req("a@b.co")).await.unwrap();
        let second = store.insert_user_with_credentials(req("a@b.co")).await;
        assert!(matches!(second, Err(AppError::BadRequest(_))));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleted_user_frees_the_email() {
        let store = MemoryStore::new();
        let user = store
            .insert_user_with_credentials(UserCreateRequest {
                email: "gone@b.co".to_string(),
                name: "G".to_string(),
                password_hash: "h".to_string(),
            })
            .await
            .unwrap();
        store.insert_invoice(user.id, data("1", "E1")).await.unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(!store.delete_user(user.id).await.unwrap());
        assert!(!store.exists_user_by_email("gone@b.co").await.unwrap());
        assert!(store.get_user_with_password_hash("gone@b.co").await.unwrap().is_none());
        assert!(store.list_invoices(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invoices_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let inv = store.insert_invoice(owner, data("1", "E1")).await.unwrap();

        assert!(store.get_invoice(other, inv.id).await.unwrap().is_none());
        assert!(!store.delete_invoice(other, inv.id).await.unwrap());
        assert!(store.get_invoice(owner, inv.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let inv = store.insert_invoice(owner, data("1", "E1")).await.unwrap();
        assert!(store.delete_invoice(owner, inv.id).await.unwrap());
        assert!(store.get_invoice(owner, inv.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn employee_listing_filters_and_orders() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let first = store.insert_invoice(owner, data("1", "E1")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.insert_invoice(owner, data("2", "E1")).await.unwrap();
        store.insert_invoice(owner, data("3", "E2")).await.unwrap();

        let listed = store.list_invoices_by_employee(owner, "E1").await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
