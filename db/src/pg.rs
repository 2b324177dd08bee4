use async_trait::async_trait;
use common::error::Res;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    company,
    dtos::{
        company::{CompanyCreateRequest, CompanyUpdateRequest},
        invoice::InvoiceData,
        user::UserCreateRequest,
    },
    invoice,
    models::{
        company::CompanyInfo,
        invoice::Invoice,
        user::{AuthCredentials, User},
    },
    store::{CompanyStore, InvoiceStore, UserStore},
    user,
};

/// Postgres-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn exists_user_by_email(&self, email: &str) -> Res<bool> {
        user::exists_user_by_email(&self.pool, email).await
    }

    async fn count_users(&self) -> Res<i64> {
        user::count_users(&self.pool).await
    }

    async fn insert_user_with_credentials(&self, data: UserCreateRequest) -> Res<User> {
        let mut tx = self.pool.begin().await?;
        let created = user::insert_user(&mut *tx, &data).await?;
        user::insert_user_with_credentials(
            &mut *tx,
            AuthCredentials {
                user_id: created.id,
                password_hash: data.password_hash,
            },
        )
        .await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Res<Option<User>> {
        user::get_user_by_id(&self.pool, user_id).await
    }

    async fn get_user_with_password_hash(
        &self,
        email: &str,
    ) -> Res<Option<(User, AuthCredentials)>> {
        user::get_user_with_password_hash(&self.pool, email).await
    }

    async fn set_company_info_id(&self, user_id: Uuid, company_info_id: Uuid) -> Res<()> {
        user::set_company_info_id(&self.pool, user_id, company_info_id).await
    }

    async fn delete_user(&self, user_id: Uuid) -> Res<bool> {
        user::delete_user(&self.pool, user_id).await
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn insert_company_info(&self, data: CompanyCreateRequest) -> Res<CompanyInfo> {
        company::insert_company_info(&self.pool, &data).await
    }

    async fn get_company_info_by_user(&self, user_id: Uuid) -> Res<Option<CompanyInfo>> {
        company::get_company_info_by_user(&self.pool, user_id).await
    }

    async fn update_company_info(
        &self,
        user_id: Uuid,
        data: CompanyUpdateRequest,
    ) -> Res<Option<CompanyInfo>> {
        company::update_company_info(&self.pool, user_id, &data).await
    }
}

#[async_trait]
impl InvoiceStore for PgStore {
    async fn insert_invoice(&self, created_by: Uuid, data: InvoiceData) -> Res<Invoice> {
        invoice::insert_invoice(&self.pool, created_by, &data).await
    }

    async fn get_invoice(&self, owner: Uuid, invoice_id: Uuid) -> Res<Option<Invoice>> {
        invoice::get_invoice(&self.pool, owner, invoice_id).await
    }

    async fn list_invoices(&self, owner: Uuid) -> Res<Vec<Invoice>> {
        invoice::list_invoices(&self.pool, owner).await
    }

    async fn list_invoices_by_employee(
        &self,
        owner: Uuid,
        employee_id: &str,
    ) -> Res<Vec<Invoice>> {
        invoice::list_invoices_by_employee(&self.pool, owner, employee_id).await
    }

    async fn update_invoice(
        &self,
        owner: Uuid,
        invoice_id: Uuid,
        data: InvoiceData,
    ) -> Res<Option<Invoice>> {
        invoice::update_invoice(&self.pool, owner, invoice_id, &data).await
    }

    async fn delete_invoice(&self, owner: Uuid, invoice_id: Uuid) -> Res<bool> {
        invoice::delete_invoice(&self.pool, owner, invoice_id).await
    }
}
