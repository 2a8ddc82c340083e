pub mod api;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use api::http::HttpFinanceApi;
use api::traits::FinanceApi;
use errors::CoreError;
use models::{
    bill::{Bill, NewBill},
    budget::{validate_budget_amount, Budget, NewBudget},
    category::{Category, EntryType, NewCategory},
    chart::DashboardCharts,
    dashboard::DashboardMetrics,
    filter::{FilterCriteria, FilterEdit, TransactionQuery},
    paging::PagedResult,
    period::Period,
    route::Route,
    session::{LoginRequest, RegisterRequest, Session},
    settings::ClientSettings,
    transaction::{Transaction, TransactionDraft},
    user::{ChangePasswordForm, UpdateProfile, UserProfile},
};
use services::{
    chart_service::{ChartService, LIGHT_PIE_PALETTE},
    context::AppContext,
    filter_service::FilterPipeline,
    pagination::Pagination,
    resolver::CategoryResolver,
    store::{
        accept_bills, accept_budgets, accept_metrics, accept_transactions, ApiFuture,
        EntityStore, PendingReload, ReloadOutcome, RequestToken,
    },
    summary_service::SummaryService,
    theme_service::Theme,
};

/// Main entry point of the finance-tracker client core.
///
/// Owns the context object, one store per backend collection and the views
/// derived from them. Every method that changes an input also recomputes
/// what depends on it before returning, so callers never observe a state
/// change without its consequences.
#[must_use]
pub struct FinanceTracker {
    api: Arc<dyn FinanceApi>,
    context: AppContext,
    categories: EntityStore<Vec<Category>>,
    budgets: EntityStore<Vec<Budget>>,
    bills: EntityStore<Vec<Bill>>,
    transactions: EntityStore<PagedResult<Transaction>>,
    dashboard: EntityStore<Option<DashboardMetrics>>,
    filters: FilterPipeline,
    pagination: Pagination,
    chart_service: ChartService,
    charts: DashboardCharts,
    redirect: Option<Route>,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("context", &self.context)
            .field("categories", &self.categories.data().len())
            .field("budgets", &self.budgets.data().len())
            .field("bills", &self.bills.data().len())
            .field("transactions", &self.transactions.data().items.len())
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl FinanceTracker {
    /// Wire the core to `api`, with state restored into `context`.
    pub fn new(api: Arc<dyn FinanceApi>, context: AppContext) -> Self {
        let settings = &context.settings;
        let filters = FilterPipeline::new(Duration::from_millis(settings.filter_debounce_ms));
        let pagination = Pagination::new(settings.default_page_size);
        let chart_service = ChartService::with_currency(settings.currency_symbol.clone());

        let mut tracker = Self {
            api,
            context,
            categories: EntityStore::new("categories"),
            budgets: EntityStore::new("budgets"),
            bills: EntityStore::new("bills"),
            transactions: EntityStore::new("transactions"),
            dashboard: EntityStore::new("dashboard"),
            filters,
            pagination,
            chart_service,
            charts: DashboardCharts::default(),
            redirect: None,
        };
        tracker.rebuild_charts();
        tracker
    }

    /// HTTP backend and file-backed storage as configured by `settings`.
    pub fn connect(settings: ClientSettings, today: NaiveDate) -> Result<Self, CoreError> {
        let api = Arc::new(HttpFinanceApi::from_settings(&settings));
        let context = AppContext::init_from_settings(settings, today)?;
        Ok(Self::new(api, context))
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    // ── Session ─────────────────────────────────────────────────────

    pub async fn login(&mut self, request: LoginRequest) -> Result<(), CoreError> {
        request.validate()?;
        let session = self
            .api
            .login(&request)
            .await
            .map_err(|e| rejected_credentials(e, "Login failed"))?;
        self.start_session(session)
    }

    pub async fn register(&mut self, request: RegisterRequest) -> Result<(), CoreError> {
        request.validate()?;
        let session = self
            .api
            .register(&request)
            .await
            .map_err(|e| rejected_credentials(e, "Registration failed"))?;
        self.start_session(session)
    }

    /// Clear the session, drop every cached collection and go to login.
    pub fn logout(&mut self) {
        info!("logging out");
        self.end_session();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.context.session.is_authenticated()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.context.session.current()
    }

    /// Where a navigation to `route` should actually land.
    #[must_use]
    pub fn guard(&self, route: Route) -> Route {
        route.guard(self.is_authenticated())
    }

    /// A navigation requested by the core (after login, logout or a 401).
    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }

    fn start_session(&mut self, session: Session) -> Result<(), CoreError> {
        self.reset_stores();
        let (state, storage) = self.context.session_mut();
        state.set(storage, session)?;
        self.redirect = Some(Route::Dashboard);
        Ok(())
    }

    fn end_session(&mut self) {
        let (state, storage) = self.context.session_mut();
        if let Err(e) = state.clear(storage) {
            warn!(error = %e, "could not remove persisted session");
        }
        self.reset_stores();
        self.redirect = Some(Route::Login);
    }

    fn reset_stores(&mut self) {
        self.categories.reset();
        self.budgets.reset();
        self.bills.reset();
        self.transactions.reset();
        self.dashboard.reset();
        self.pagination.reset();
        self.pagination.set_total_count(0);
        self.filters.reset();
        self.rebuild_charts();
    }

    fn bearer(&self) -> Result<String, CoreError> {
        self.context
            .session
            .token()
            .map(str::to_string)
            .ok_or(CoreError::NotAuthenticated)
    }

    /// A 401 anywhere ends the session.
    fn settle<T>(&mut self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                warn!("session rejected by backend, redirecting to login");
                self.end_session();
            }
        }
        result
    }

    /// Classify a failed mutation. Nothing is retried.
    fn settle_mutation<T>(&mut self, action: &str, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            if !e.is_unauthorized() {
                warn!(action, error = %e, "mutation failed");
            }
        }
        self.settle(result)
    }

    // ── Theme ───────────────────────────────────────────────────────

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.context.theme.theme()
    }

    /// Flip and persist the display mode, then rebuild the charts. Nothing
    /// is refetched.
    pub fn toggle_theme(&mut self) -> Result<Theme, CoreError> {
        let (state, storage) = self.context.theme_mut();
        let theme = state.toggle(storage)?;
        debug!(theme = theme.as_str(), "theme toggled");
        self.rebuild_charts();
        Ok(theme)
    }

    // ── Period ──────────────────────────────────────────────────────

    #[must_use]
    pub fn period(&self) -> Period {
        self.context.period.current()
    }

    /// Move the active period and reload budgets and dashboard for it.
    pub async fn change_period(&mut self, delta_months: i32) -> Result<Period, CoreError> {
        let period = self.context.period.advance(delta_months);
        info!(%period, "period changed");
        let budgets = self.reload_budgets().await;
        let dashboard = self.reload_dashboard().await;
        budgets.and(dashboard).map(|_| period)
    }

    // ── Store reloads ───────────────────────────────────────────────
    //
    // `begin_*` issues a token and a detached request, `finish_*` applies
    // the result if the token is still the latest. `reload_*` does both.

    pub fn begin_categories_reload(&mut self) -> Result<PendingReload<Vec<Category>>, CoreError> {
        let bearer = self.bearer()?;
        let api = Arc::clone(&self.api);
        let request: ApiFuture<Vec<Category>> =
            Box::pin(async move { api.get_categories(&bearer).await });
        Ok(PendingReload {
            token: self.categories.begin_reload(),
            request,
        })
    }

    pub fn finish_categories_reload(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Category>, CoreError>,
    ) -> Result<ReloadOutcome, CoreError> {
        let outcome = self.categories.complete(token, result);
        self.settle(outcome)
    }

    pub async fn reload_categories(&mut self) -> Result<ReloadOutcome, CoreError> {
        let pending = self.begin_categories_reload()?;
        let result = pending.request.await;
        self.finish_categories_reload(pending.token, result)
    }

    pub fn begin_budgets_reload(&mut self) -> Result<PendingReload<Vec<Budget>>, CoreError> {
        let bearer = self.bearer()?;
        let api = Arc::clone(&self.api);
        let period = self.period();
        let request: ApiFuture<Vec<Budget>> = Box::pin(async move {
            let budgets = api.get_budgets(&bearer, period).await?;
            accept_budgets(budgets, period)
        });
        Ok(PendingReload {
            token: self.budgets.begin_reload(),
            request,
        })
    }

    pub fn finish_budgets_reload(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Budget>, CoreError>,
    ) -> Result<ReloadOutcome, CoreError> {
        let outcome = self.budgets.complete(token, result);
        if matches!(outcome, Ok(ReloadOutcome::Applied)) {
            self.rebuild_charts();
        }
        self.settle(outcome)
    }

    pub async fn reload_budgets(&mut self) -> Result<ReloadOutcome, CoreError> {
        let pending = self.begin_budgets_reload()?;
        let result = pending.request.await;
        self.finish_budgets_reload(pending.token, result)
    }

    pub fn begin_bills_reload(&mut self) -> Result<PendingReload<Vec<Bill>>, CoreError> {
        let bearer = self.bearer()?;
        let api = Arc::clone(&self.api);
        let request: ApiFuture<Vec<Bill>> =
            Box::pin(async move { accept_bills(api.get_bills(&bearer).await?) });
        Ok(PendingReload {
            token: self.bills.begin_reload(),
            request,
        })
    }

    pub fn finish_bills_reload(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Bill>, CoreError>,
    ) -> Result<ReloadOutcome, CoreError> {
        let outcome = self.bills.complete(token, result);
        self.settle(outcome)
    }

    pub async fn reload_bills(&mut self) -> Result<ReloadOutcome, CoreError> {
        let pending = self.begin_bills_reload()?;
        let result = pending.request.await;
        self.finish_bills_reload(pending.token, result)
    }

    /// Request the current page with the current filter criteria.
    pub fn begin_transactions_reload(
        &mut self,
    ) -> Result<PendingReload<PagedResult<Transaction>>, CoreError> {
        let bearer = self.bearer()?;
        let api = Arc::clone(&self.api);
        let query = self.transaction_query();
        let request: ApiFuture<PagedResult<Transaction>> = Box::pin(async move {
            accept_transactions(api.get_transactions(&bearer, &query).await?)
        });
        Ok(PendingReload {
            token: self.transactions.begin_reload(),
            request,
        })
    }

    pub fn finish_transactions_reload(
        &mut self,
        token: RequestToken,
        result: Result<PagedResult<Transaction>, CoreError>,
    ) -> Result<ReloadOutcome, CoreError> {
        let outcome = self.transactions.complete(token, result);
        if matches!(outcome, Ok(ReloadOutcome::Applied)) {
            self.pagination
                .set_total_count(self.transactions.data().total_count);
        }
        self.settle(outcome)
    }

    pub async fn reload_transactions(&mut self) -> Result<ReloadOutcome, CoreError> {
        let pending = self.begin_transactions_reload()?;
        let result = pending.request.await;
        self.finish_transactions_reload(pending.token, result)
    }

    pub fn begin_dashboard_reload(
        &mut self,
    ) -> Result<PendingReload<Option<DashboardMetrics>>, CoreError> {
        let bearer = self.bearer()?;
        let api = Arc::clone(&self.api);
        let period = self.period();
        let request: ApiFuture<Option<DashboardMetrics>> = Box::pin(async move {
            let metrics = api.get_dashboard(&bearer, period).await?;
            accept_metrics(metrics, &LIGHT_PIE_PALETTE)
        });
        Ok(PendingReload {
            token: self.dashboard.begin_reload(),
            request,
        })
    }

    pub fn finish_dashboard_reload(
        &mut self,
        token: RequestToken,
        result: Result<Option<DashboardMetrics>, CoreError>,
    ) -> Result<ReloadOutcome, CoreError> {
        let outcome = self.dashboard.complete(token, result);
        if matches!(outcome, Ok(ReloadOutcome::Applied)) {
            self.rebuild_charts();
        }
        self.settle(outcome)
    }

    pub async fn reload_dashboard(&mut self) -> Result<ReloadOutcome, CoreError> {
        let pending = self.begin_dashboard_reload()?;
        let result = pending.request.await;
        self.finish_dashboard_reload(pending.token, result)
    }

    // ── Store accessors ─────────────────────────────────────────────

    #[must_use]
    pub fn categories(&self) -> &EntityStore<Vec<Category>> {
        &self.categories
    }

    #[must_use]
    pub fn budgets(&self) -> &EntityStore<Vec<Budget>> {
        &self.budgets
    }

    #[must_use]
    pub fn bills(&self) -> &EntityStore<Vec<Bill>> {
        &self.bills
    }

    #[must_use]
    pub fn transactions(&self) -> &EntityStore<PagedResult<Transaction>> {
        &self.transactions
    }

    #[must_use]
    pub fn dashboard(&self) -> &EntityStore<Option<DashboardMetrics>> {
        &self.dashboard
    }

    // ── Categories ──────────────────────────────────────────────────

    pub async fn create_category(&mut self, category: NewCategory) -> Result<(), CoreError> {
        category.validate()?;
        let bearer = self.bearer()?;
        let result = self.api.create_category(&bearer, &category).await;
        self.settle_mutation("create category", result)?;
        log_refresh(self.reload_categories().await);
        Ok(())
    }

    /// Default categories cannot be deleted.
    pub async fn delete_category(&mut self, id: Uuid) -> Result<(), CoreError> {
        if let Some(category) = self.resolver().by_id(id) {
            if !category.is_deletable() {
                return Err(CoreError::ValidationError(format!(
                    "'{}' is a default category and cannot be deleted",
                    category.name
                )));
            }
        }
        let bearer = self.bearer()?;
        let result = self.api.delete_category(&bearer, id).await;
        self.settle_mutation("delete category", result)?;
        log_refresh(self.reload_categories().await);
        Ok(())
    }

    #[must_use]
    pub fn resolver(&self) -> CategoryResolver<'_> {
        CategoryResolver::new(self.categories.data())
    }

    /// Categories offered by the transaction form for `entry_type`, by name.
    #[must_use]
    pub fn transaction_form_categories(&self, entry_type: EntryType) -> Vec<&Category> {
        self.resolver().of_type(entry_type)
    }

    /// Bills are always expenses.
    #[must_use]
    pub fn bill_form_categories(&self) -> Vec<&Category> {
        self.resolver().of_type(EntryType::Expense)
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Budget a category for the active period.
    pub async fn create_budget(&mut self, category_id: Uuid, amount: f64) -> Result<(), CoreError> {
        let budget = NewBudget::for_period(category_id, amount, self.period());
        budget.validate()?;
        match self.resolver().by_id(category_id) {
            Some(c) if c.category_type == EntryType::Expense => {}
            _ => {
                return Err(CoreError::ValidationError(
                    "Budgets need an expense category".into(),
                ))
            }
        }
        let bearer = self.bearer()?;
        let result = self.api.create_budget(&bearer, &budget).await;
        let id = self.settle_mutation("create budget", result)?;
        debug!(budget = %id, "budget created");
        log_refresh(self.reload_budgets().await);
        Ok(())
    }

    /// Only the amount of a budget can change.
    pub async fn update_budget(&mut self, id: Uuid, amount: f64) -> Result<(), CoreError> {
        validate_budget_amount(amount)?;
        let bearer = self.bearer()?;
        let result = self.api.update_budget(&bearer, id, amount).await;
        self.settle_mutation("update budget", result)?;
        log_refresh(self.reload_budgets().await);
        Ok(())
    }

    pub async fn delete_budget(&mut self, id: Uuid) -> Result<(), CoreError> {
        let bearer = self.bearer()?;
        let result = self.api.delete_budget(&bearer, id).await;
        self.settle_mutation("delete budget", result)?;
        log_refresh(self.reload_budgets().await);
        Ok(())
    }

    /// Expense categories without a budget in the active period.
    #[must_use]
    pub fn available_budget_categories(&self) -> Vec<&Category> {
        self.resolver().available_for_budget(self.budgets.data())
    }

    #[must_use]
    pub fn total_budget(&self) -> f64 {
        SummaryService::total_budget(self.budgets.data())
    }

    #[must_use]
    pub fn total_spent(&self) -> f64 {
        SummaryService::total_spent(self.budgets.data())
    }

    // ── Bills ───────────────────────────────────────────────────────

    /// Create the bill, or update bill `id` when given.
    pub async fn save_bill(&mut self, id: Option<Uuid>, bill: NewBill) -> Result<(), CoreError> {
        let bill = bill.validated()?;
        let bearer = self.bearer()?;
        let result = match id {
            Some(id) => self.api.update_bill(&bearer, id, &bill).await,
            None => self.api.create_bill(&bearer, &bill).await.map(|_| ()),
        };
        self.settle_mutation("save bill", result)?;
        log_refresh(self.reload_bills().await);
        Ok(())
    }

    pub async fn delete_bill(&mut self, id: Uuid) -> Result<(), CoreError> {
        let bearer = self.bearer()?;
        let result = self.api.delete_bill(&bearer, id).await;
        self.settle_mutation("delete bill", result)?;
        log_refresh(self.reload_bills().await);
        Ok(())
    }

    /// Send the negation of the cached paid flag, then reload.
    pub async fn toggle_bill_paid(&mut self, id: Uuid) -> Result<(), CoreError> {
        let is_paid = self
            .bills
            .data()
            .iter()
            .find(|b| b.id == id)
            .map(|b| !b.is_paid)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown bill {id}")))?;
        let bearer = self.bearer()?;
        let result = self.api.set_bill_paid(&bearer, id, is_paid).await;
        self.settle_mutation("toggle bill paid", result)?;
        log_refresh(self.reload_bills().await);
        Ok(())
    }

    #[must_use]
    pub fn upcoming_bills(&self) -> Vec<&Bill> {
        SummaryService::upcoming_bills(self.bills.data())
    }

    #[must_use]
    pub fn paid_bills(&self) -> Vec<&Bill> {
        SummaryService::paid_bills(self.bills.data())
    }

    #[must_use]
    pub fn total_upcoming(&self) -> f64 {
        SummaryService::total_upcoming(self.bills.data())
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Create the transaction, or update transaction `id` when given.
    pub async fn save_transaction(
        &mut self,
        id: Option<Uuid>,
        draft: &TransactionDraft,
    ) -> Result<(), CoreError> {
        let transaction = draft.validate()?;
        let bearer = self.bearer()?;
        let result = match id {
            Some(id) => self.api.update_transaction(&bearer, id, &transaction).await,
            None => self
                .api
                .create_transaction(&bearer, &transaction)
                .await
                .map(|_| ()),
        };
        self.settle_mutation("save transaction", result)?;
        log_refresh(self.reload_transactions().await);
        Ok(())
    }

    pub async fn delete_transaction(&mut self, id: Uuid) -> Result<(), CoreError> {
        let bearer = self.bearer()?;
        let result = self.api.delete_transaction(&bearer, id).await;
        self.settle_mutation("delete transaction", result)?;
        log_refresh(self.reload_transactions().await);
        Ok(())
    }

    /// Prefill the edit form for `transaction`.
    ///
    /// When the record carries no category id, the category is looked up by
    /// name and type; an ambiguous or missing match leaves it unset for the
    /// user to pick.
    #[must_use]
    pub fn edit_draft(&self, transaction: &Transaction) -> TransactionDraft {
        let mut draft = TransactionDraft::from_transaction(transaction);
        draft.category_id = self.resolver().resolve(transaction).map(|c| c.id);
        if draft.category_id.is_none() {
            debug!(
                transaction = %transaction.id,
                category = %transaction.category_name,
                "category not resolved for edit"
            );
        }
        draft
    }

    // ── Filters & paging ────────────────────────────────────────────

    /// Record a raw filter edit made at `now`. Call
    /// [`poll_filters`](Self::poll_filters) once
    /// [`filter_deadline`](Self::filter_deadline) has passed.
    pub fn edit_filter(&mut self, edit: FilterEdit, now: Instant) -> Result<(), CoreError> {
        self.filters.push(edit, now)
    }

    #[must_use]
    pub fn filter_deadline(&self) -> Option<Instant> {
        self.filters.deadline()
    }

    /// Apply settled filter criteria: back to the first page, then reload.
    /// `Ok(None)` when nothing changed.
    pub async fn poll_filters(&mut self, now: Instant) -> Result<Option<ReloadOutcome>, CoreError> {
        if self.filters.poll(now).is_none() {
            return Ok(None);
        }
        self.pagination.reset();
        self.reload_transactions().await.map(Some)
    }

    #[must_use]
    pub fn filter_criteria(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    #[must_use]
    pub fn filters(&self) -> &FilterPipeline {
        &self.filters
    }

    /// Move the page window and reload. Filter criteria are untouched.
    pub async fn set_page(&mut self, page_index: u64, page_size: u64) -> Result<ReloadOutcome, CoreError> {
        self.pagination.set_page(page_index, page_size);
        self.reload_transactions().await
    }

    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[must_use]
    pub fn transaction_query(&self) -> TransactionQuery {
        TransactionQuery {
            criteria: self.filters.criteria().clone(),
            page_number: self.pagination.page_number(),
            page_size: self.pagination.page_size(),
        }
    }

    // ── Profile ─────────────────────────────────────────────────────

    pub async fn profile(&mut self) -> Result<UserProfile, CoreError> {
        let bearer = self.bearer()?;
        let result = self.api.get_profile(&bearer).await;
        self.settle(result)
    }

    /// Update the profile and the names kept in the persisted session.
    pub async fn update_profile(&mut self, profile: UpdateProfile) -> Result<UserProfile, CoreError> {
        profile.validate()?;
        let bearer = self.bearer()?;
        let result = self.api.update_profile(&bearer, &profile).await;
        let updated = self.settle_mutation("update profile", result)?;

        if let Some(mut session) = self.context.session.current().cloned() {
            session.first_name = updated.first_name.clone();
            session.last_name = updated.last_name.clone();
            session.email = updated.email.clone();
            let (state, storage) = self.context.session_mut();
            state.set(storage, session)?;
        }
        Ok(updated)
    }

    pub async fn change_password(&mut self, form: &ChangePasswordForm) -> Result<(), CoreError> {
        let request = form.validate()?;
        let bearer = self.bearer()?;
        let result = self.api.change_password(&bearer, &request).await;
        self.settle_mutation("change password", result)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Chart configurations for the current metrics, budgets and theme.
    #[must_use]
    pub fn charts(&self) -> &DashboardCharts {
        &self.charts
    }

    fn rebuild_charts(&mut self) {
        self.charts = self.chart_service.build(
            self.dashboard.data().as_ref(),
            self.budgets.data(),
            self.context.theme.theme(),
        );
    }
}

/// A 401 from the auth endpoints means bad credentials, not an expired
/// session.
fn rejected_credentials(e: CoreError, message: &str) -> CoreError {
    warn!(error = %e, "{}", message);
    match e {
        CoreError::Unauthorized => CoreError::Api {
            status: 401,
            message: message.to_string(),
        },
        other => other,
    }
}

/// The follow-up reload after a successful mutation does not fail the
/// mutation; its error stays on the store.
fn log_refresh(result: Result<ReloadOutcome, CoreError>) {
    if let Err(e) = result {
        debug!(error = %e, "refresh after mutation failed");
    }
}
