use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::bill::Bill;
use crate::models::budget::Budget;
use crate::models::dashboard::DashboardMetrics;
use crate::models::paging::PagedResult;
use crate::models::period::Period;
use crate::models::transaction::Transaction;

/// A request in flight, detached from the store that issued it.
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'static>>;

/// Identifies one reload request of one store. Tokens increase monotonically
/// per store; only the highest issued token may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    store: &'static str,
    seq: u64,
}

impl RequestToken {
    #[must_use]
    pub fn store(&self) -> &'static str {
        self.store
    }

    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// A reload that has been issued but not yet completed. Await `request`,
/// then hand the result back with the token.
pub struct PendingReload<T> {
    pub token: RequestToken,
    pub request: ApiFuture<T>,
}

/// What happened to a completed reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The response was the latest and is now the cached value.
    Applied,
    /// A newer request was issued meanwhile; the response was discarded.
    Stale,
}

/// Local cache of one backend collection plus its loading/error status.
///
/// - Reloads are two-phase: [`begin_reload`](Self::begin_reload) issues a
///   token, [`complete`](Self::complete) applies the result only if that
///   token is still the latest (latest-wins).
/// - A failed reload keeps the last good value and records an error message.
/// - 401 is returned to the caller without touching the error flag.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    name: &'static str,
    data: T,
    loading: bool,
    error: Option<String>,
    latest: u64,
    loaded: bool,
}

impl<T: Default> EntityStore<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            data: T::default(),
            loading: false,
            error: None,
            latest: 0,
            loaded: false,
        }
    }

    /// Drop the cached value (on logout). Pending requests become stale.
    pub fn reset(&mut self) {
        self.data = T::default();
        self.loading = false;
        self.error = None;
        self.loaded = false;
        self.latest += 1;
    }
}

impl<T> EntityStore<T> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The current cached value (possibly stale after a failed reload).
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// User-facing message of the last failed reload, cleared on success.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` once any reload has been applied.
    #[must_use]
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Issue a new request token. Every earlier token becomes stale.
    pub fn begin_reload(&mut self) -> RequestToken {
        self.latest += 1;
        self.loading = true;
        debug!(store = self.name, token = self.latest, "reload started");
        RequestToken {
            store: self.name,
            seq: self.latest,
        }
    }

    #[must_use]
    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.store == self.name && token.seq == self.latest
    }

    /// Apply a reload result if `token` is still the latest.
    ///
    /// Stale results (success or failure) are discarded and reported as
    /// `Ok(ReloadOutcome::Stale)`. A failure of the latest request keeps the
    /// cached value and is returned to the caller.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<T, CoreError>,
    ) -> Result<ReloadOutcome, CoreError> {
        if !self.is_latest(token) {
            debug!(
                store = self.name,
                token = token.seq,
                latest = self.latest,
                "discarding stale response"
            );
            return Ok(ReloadOutcome::Stale);
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
                self.loaded = true;
                debug!(store = self.name, token = token.seq, "reload applied");
                Ok(ReloadOutcome::Applied)
            }
            Err(CoreError::Unauthorized) => {
                warn!(store = self.name, "reload rejected: unauthorized");
                Err(CoreError::Unauthorized)
            }
            Err(e) => {
                warn!(store = self.name, error = %e, "reload failed, keeping cached data");
                self.error = Some(e.user_message(&format!("Failed to load {}", self.name)));
                Err(e)
            }
        }
    }
}

// ── Store boundary checks ───────────────────────────────────────────
//
// Responses are checked here, before they reach the cache, so nothing
// downstream (resolver, chart builder) has to handle malformed records.

/// Validate budgets and keep only those belonging to `period`.
pub fn accept_budgets(budgets: Vec<Budget>, period: Period) -> Result<Vec<Budget>, CoreError> {
    let total = budgets.len();
    let mut accepted = Vec::with_capacity(total);
    for budget in budgets {
        budget.validate()?;
        if period.matches(budget.month, budget.year) {
            accepted.push(budget);
        }
    }
    if accepted.len() != total {
        warn!(
            period = %period,
            dropped = total - accepted.len(),
            "backend returned budgets outside the requested period"
        );
    }
    Ok(accepted)
}

pub fn accept_bills(bills: Vec<Bill>) -> Result<Vec<Bill>, CoreError> {
    for bill in &bills {
        bill.validate()?;
    }
    Ok(bills)
}

pub fn accept_transactions(
    page: PagedResult<Transaction>,
) -> Result<PagedResult<Transaction>, CoreError> {
    for tx in &page.items {
        tx.validate()?;
    }
    Ok(page)
}

/// Validate the snapshot and apply the monochrome category palette.
pub fn accept_metrics(
    mut metrics: DashboardMetrics,
    palette: &[&str],
) -> Result<Option<DashboardMetrics>, CoreError> {
    metrics.validate()?;
    metrics.apply_palette(palette);
    Ok(Some(metrics))
}
