use async_trait::async_trait;
use common::error::Res;
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
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_user_by_email(&self, email: &str) -> Res<bool>;
    async fn count_users(&self) -> Res<i64>;
    /// Inserts the user and its password hash. A taken email is a `BadRequest`.
    async fn insert_user_with_credentials(&self, data: UserCreateRequest) -> Res<User>;
    async fn get_user_by_id(&self, user_id: Uuid) -> Res<Option<User>>;
    async fn get_user_with_password_hash(
        &self,
        email: &str,
    ) -> Res<Option<(User, AuthCredentials)>>;
    async fn set_company_info_id(&self, user_id: Uuid, company_info_id: Uuid) -> Res<()>;
    /// Removes the user with everything it owns. Returns `false` when nothing was deleted.
    async fn delete_user(&self, user_id: Uuid) -> Res<bool>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn insert_company_info(&self, data: CompanyCreateRequest) -> Res<CompanyInfo>;
    async fn get_company_info_by_user(&self, user_id: Uuid) -> Res<Option<CompanyInfo>>;
    async fn update_company_info(
        &self,
        user_id: Uuid,
        data: CompanyUpdateRequest,
    ) -> Res<Option<CompanyInfo>>;
}

/// Invoices are always addressed together with their owner, so one user
/// never sees another user's invoices.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert_invoice(&self, created_by: Uuid, data: InvoiceData) -> Res<Invoice>;
    async fn get_invoice(&self, owner: Uuid, invoice_id: Uuid) -> Res<Option<Invoice>>;
    /// Newest first.
    async fn list_invoices(&self, owner: Uuid) -> Res<Vec<Invoice>>;
    /// Newest first.
    async fn list_invoices_by_employee(&self, owner: Uuid, employee_id: &str)
    -> Res<Vec<Invoice>>;
    async fn update_invoice(
        &self,
        owner: Uuid,
        invoice_id: Uuid,
        data: InvoiceData,
    ) -> Res<Option<Invoice>>;
    /// Returns `false` when nothing was deleted.
    async fn delete_invoice(&self, owner: Uuid, invoice_id: Uuid) -> Res<bool>;
}

pub trait Store: UserStore + CompanyStore + InvoiceStore {}

impl<T: UserStore + CompanyStore + InvoiceStore> Store for T {}
