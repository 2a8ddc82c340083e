use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::bill::{Bill, NewBill};
use crate::models::budget::{Budget, NewBudget};
use crate::models::category::{Category, NewCategory};
use crate::models::dashboard::DashboardMetrics;
use crate::models::filter::TransactionQuery;
use crate::models::paging::PagedResult;
use crate::models::period::Period;
use crate::models::session::{LoginRequest, RegisterRequest, Session};
use crate::models::transaction::{NewTransaction, Transaction};
use crate::models::user::{ChangePassword, UpdateProfile, UserProfile};

/// The finance backend, one method per endpoint.
///
/// The HTTP client implements this; tests substitute an in-memory mock.
/// Authenticated calls take the bearer token explicitly so implementations
/// hold no session state of their own.
///
/// Implementations must report HTTP 401 as [`CoreError::Unauthorized`].
#[async_trait]
pub trait FinanceApi: Send + Sync {
    // ── Auth ────────────────────────────────────────────────────────
    async fn register(&self, request: &RegisterRequest) -> Result<Session, CoreError>;

    async fn login(&self, request: &LoginRequest) -> Result<Session, CoreError>;

    // ── Categories ──────────────────────────────────────────────────
    async fn get_categories(&self, token: &str) -> Result<Vec<Category>, CoreError>;

    async fn create_category(
        &self,
        token: &str,
        category: &NewCategory,
    ) -> Result<Category, CoreError>;

    async fn delete_category(&self, token: &str, id: Uuid) -> Result<(), CoreError>;

    // ── Budgets ─────────────────────────────────────────────────────
    async fn get_budgets(&self, token: &str, period: Period) -> Result<Vec<Budget>, CoreError>;

    /// Returns the new budget's id as sent by the backend.
    async fn create_budget(&self, token: &str, budget: &NewBudget) -> Result<String, CoreError>;

    /// Only the amount of an existing budget can change.
    async fn update_budget(&self, token: &str, id: Uuid, amount: f64) -> Result<(), CoreError>;

    async fn delete_budget(&self, token: &str, id: Uuid) -> Result<(), CoreError>;

    // ── Bills ───────────────────────────────────────────────────────
    async fn get_bills(&self, token: &str) -> Result<Vec<Bill>, CoreError>;

    async fn create_bill(&self, token: &str, bill: &NewBill) -> Result<Uuid, CoreError>;

    async fn update_bill(&self, token: &str, id: Uuid, bill: &NewBill) -> Result<(), CoreError>;

    async fn delete_bill(&self, token: &str, id: Uuid) -> Result<(), CoreError>;

    async fn set_bill_paid(&self, token: &str, id: Uuid, is_paid: bool) -> Result<(), CoreError>;

    // ── Transactions ────────────────────────────────────────────────
    async fn get_transactions(
        &self,
        token: &str,
        query: &TransactionQuery,
    ) -> Result<PagedResult<Transaction>, CoreError>;

    async fn create_transaction(
        &self,
        token: &str,
        transaction: &NewTransaction,
    ) -> Result<Uuid, CoreError>;

    async fn update_transaction(
        &self,
        token: &str,
        id: Uuid,
        transaction: &NewTransaction,
    ) -> Result<(), CoreError>;

    async fn delete_transaction(&self, token: &str, id: Uuid) -> Result<(), CoreError>;

    // ── Dashboard ───────────────────────────────────────────────────
    async fn get_dashboard(&self, token: &str, period: Period)
        -> Result<DashboardMetrics, CoreError>;

    // ── Profile ─────────────────────────────────────────────────────
    async fn get_profile(&self, token: &str) -> Result<UserProfile, CoreError>;

    async fn update_profile(
        &self,
        token: &str,
        profile: &UpdateProfile,
    ) -> Result<UserProfile, CoreError>;

    async fn change_password(&self, token: &str, request: &ChangePassword)
        -> Result<(), CoreError>;
}
