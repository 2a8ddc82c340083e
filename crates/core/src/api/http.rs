use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::bill::{Bill, NewBill, PaidStatus};
use crate::models::budget::{Budget, NewBudget};
use crate::models::category::{Category, NewCategory};
use crate::models::dashboard::DashboardMetrics;
use crate::models::filter::TransactionQuery;
use crate::models::paging::PagedResult;
use crate::models::period::Period;
use crate::models::session::{LoginRequest, RegisterRequest, Session};
use crate::models::settings::ClientSettings;
use crate::models::transaction::{NewTransaction, Transaction};
use crate::models::user::{ChangePassword, UpdateProfile, UserProfile};

use super::traits::FinanceApi;

/// JSON-over-HTTP client for the finance backend.
///
/// - Authenticated requests carry `Authorization: Bearer <token>`.
/// - 401 maps to [`CoreError::Unauthorized`]; other failures to
///   [`CoreError::Api`] with the server's `message` when it sent one.
/// - Transaction writes are multipart forms (the receipt is a file part).
pub struct HttpFinanceApi {
    client: Client,
    base_url: String,
}

impl HttpFinanceApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(
            settings.api_base_url.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Absolute URL for an endpoint path such as `/budgets`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, CoreError> {
        let response = request.send().await?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CoreError> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| CoreError::MalformedResponse(format!("Failed to parse response body: {e}")))
    }
}

// ── Backend response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct CreatedId {
    id: Uuid,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn check_status(response: Response) -> Result<Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(CoreError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "backend returned an error status");
    Err(CoreError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// The backend reports errors as `{ "message": ... }`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string())
}

fn transaction_form(transaction: &NewTransaction) -> Result<Form, CoreError> {
    let mut form = Form::new();
    for (name, value) in transaction.form_fields() {
        form = form.text(name, value);
    }
    if let Some(receipt) = &transaction.receipt {
        let part = Part::bytes(receipt.bytes.clone())
            .file_name(receipt.file_name.clone())
            .mime_str(&receipt.content_type)
            .map_err(|e| CoreError::ValidationError(format!("Invalid receipt content type: {e}")))?;
        form = form.part("receiptImage", part);
    }
    Ok(form)
}

#[async_trait]
impl FinanceApi for HttpFinanceApi {
    async fn register(&self, request: &RegisterRequest) -> Result<Session, CoreError> {
        self.send_json(self.client.post(self.url("/auth/register")).json(request))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, CoreError> {
        self.send_json(self.client.post(self.url("/auth/login")).json(request))
            .await
    }

    async fn get_categories(&self, token: &str) -> Result<Vec<Category>, CoreError> {
        self.send_json(self.client.get(self.url("/categories")).bearer_auth(token))
            .await
    }

    async fn create_category(
        &self,
        token: &str,
        category: &NewCategory,
    ) -> Result<Category, CoreError> {
        self.send_json(
            self.client
                .post(self.url("/categories"))
                .bearer_auth(token)
                .json(category),
        )
        .await
    }

    async fn delete_category(&self, token: &str, id: Uuid) -> Result<(), CoreError> {
        self.send(
            self.client
                .delete(self.url(&format!("/categories/{id}")))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn get_budgets(&self, token: &str, period: Period) -> Result<Vec<Budget>, CoreError> {
        self.send_json(
            self.client
                .get(self.url("/budgets"))
                .bearer_auth(token)
                .query(&period.query_pairs()),
        )
        .await
    }

    async fn create_budget(&self, token: &str, budget: &NewBudget) -> Result<String, CoreError> {
        let response = self
            .send(
                self.client
                    .post(self.url("/budgets"))
                    .bearer_auth(token)
                    .json(budget),
            )
            .await?;
        let body = response.text().await?;
        Ok(body.trim().trim_matches('"').to_string())
    }

    async fn update_budget(&self, token: &str, id: Uuid, amount: f64) -> Result<(), CoreError> {
        // The body is the bare amount, not an object.
        self.send(
            self.client
                .put(self.url(&format!("/budgets/{id}")))
                .bearer_auth(token)
                .json(&amount),
        )
        .await?;
        Ok(())
    }

    async fn delete_budget(&self, token: &str, id: Uuid) -> Result<(), CoreError> {
        self.send(
            self.client
                .delete(self.url(&format!("/budgets/{id}")))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn get_bills(&self, token: &str) -> Result<Vec<Bill>, CoreError> {
        self.send_json(self.client.get(self.url("/bills")).bearer_auth(token))
            .await
    }

    async fn create_bill(&self, token: &str, bill: &NewBill) -> Result<Uuid, CoreError> {
        let created: CreatedId = self
            .send_json(self.client.post(self.url("/bills")).bearer_auth(token).json(bill))
            .await?;
        Ok(created.id)
    }

    async fn update_bill(&self, token: &str, id: Uuid, bill: &NewBill) -> Result<(), CoreError> {
        self.send(
            self.client
                .put(self.url(&format!("/bills/{id}")))
                .bearer_auth(token)
                .json(bill),
        )
        .await?;
        Ok(())
    }

    async fn delete_bill(&self, token: &str, id: Uuid) -> Result<(), CoreError> {
        self.send(
            self.client
                .delete(self.url(&format!("/bills/{id}")))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn set_bill_paid(&self, token: &str, id: Uuid, is_paid: bool) -> Result<(), CoreError> {
        self.send(
            self.client
                .patch(self.url(&format!("/bills/{id}/paid")))
                .bearer_auth(token)
                .json(&PaidStatus { is_paid }),
        )
        .await?;
        Ok(())
    }

    async fn get_transactions(
        &self,
        token: &str,
        query: &TransactionQuery,
    ) -> Result<PagedResult<Transaction>, CoreError> {
        self.send_json(
            self.client
                .get(self.url("/transactions"))
                .bearer_auth(token)
                .query(&query.to_query_pairs()),
        )
        .await
    }

    async fn create_transaction(
        &self,
        token: &str,
        transaction: &NewTransaction,
    ) -> Result<Uuid, CoreError> {
        let form = transaction_form(transaction)?;
        let created: CreatedId = self
            .send_json(
                self.client
                    .post(self.url("/transactions"))
                    .bearer_auth(token)
                    .multipart(form),
            )
            .await?;
        Ok(created.id)
    }

    async fn update_transaction(
        &self,
        token: &str,
        id: Uuid,
        transaction: &NewTransaction,
    ) -> Result<(), CoreError> {
        let form = transaction_form(transaction)?;
        self.send(
            self.client
                .put(self.url(&format!("/transactions/{id}")))
                .bearer_auth(token)
                .multipart(form),
        )
        .await?;
        Ok(())
    }

    async fn delete_transaction(&self, token: &str, id: Uuid) -> Result<(), CoreError> {
        self.send(
            self.client
                .delete(self.url(&format!("/transactions/{id}")))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn get_dashboard(
        &self,
        token: &str,
        period: Period,
    ) -> Result<DashboardMetrics, CoreError> {
        self.send_json(
            self.client
                .get(self.url("/dashboard"))
                .bearer_auth(token)
                .query(&period.query_pairs()),
        )
        .await
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile, CoreError> {
        self.send_json(self.client.get(self.url("/users/profile")).bearer_auth(token))
            .await
    }

    async fn update_profile(
        &self,
        token: &str,
        profile: &UpdateProfile,
    ) -> Result<UserProfile, CoreError> {
        self.send_json(
            self.client
                .put(self.url("/users/profile"))
                .bearer_auth(token)
                .json(profile),
        )
        .await
    }

    async fn change_password(
        &self,
        token: &str,
        request: &ChangePassword,
    ) -> Result<(), CoreError> {
        self.send(
            self.client
                .post(self.url("/users/change-password"))
                .bearer_auth(token)
                .json(request),
        )
        .await?;
        Ok(())
    }
}
