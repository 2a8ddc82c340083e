use std::time::{Duration, Instant};

use tracing::debug;

use crate::errors::CoreError;
use crate::models::filter::{FilterCriteria, FilterEdit, RawFilterInput};

/// Coalesces raw filter edits into distinct criteria emissions.
///
/// Each accepted edit restarts a trailing debounce window. When the window
/// elapses, [`poll`](Self::poll) emits the normalized criteria unless they
/// equal the last emitted value. The clock is injected so callers decide how
/// to wait (`tokio::time::sleep_until(deadline)` in an event loop, plain
/// instants in tests).
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    raw: RawFilterInput,
    debounce: Duration,
    deadline: Option<Instant>,
    last_emitted: FilterCriteria,
}

impl FilterPipeline {
    pub fn new(debounce: Duration) -> Self {
        Self {
            raw: RawFilterInput::default(),
            debounce,
            deadline: None,
            last_emitted: FilterCriteria::default(),
        }
    }

    /// Record an edit made at `now`.
    ///
    /// The raw form value is always stored. If it does not normalize, no
    /// emission is scheduled and the validation error is returned.
    pub fn push(&mut self, edit: FilterEdit, now: Instant) -> Result<(), CoreError> {
        self.raw.apply(edit);
        match self.raw.normalize() {
            Ok(_) => {
                self.deadline = Some(now + self.debounce);
                Ok(())
            }
            Err(e) => {
                self.deadline = None;
                Err(e)
            }
        }
    }

    /// When the pending window elapses, if an emission is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Emit the settled criteria once the window has elapsed and they differ
    /// from the previous emission.
    pub fn poll(&mut self, now: Instant) -> Option<FilterCriteria> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;

        let criteria = self.raw.normalize().ok()?;
        if criteria == self.last_emitted {
            debug!("filter settled on unchanged criteria, suppressed");
            return None;
        }
        debug!(?criteria, "filter criteria changed");
        self.last_emitted = criteria.clone();
        Some(criteria)
    }

    /// The criteria currently driving the transaction list.
    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.last_emitted
    }

    /// Drop all input and the last emission, as on a fresh session.
    pub fn reset(&mut self) {
        self.raw = RawFilterInput::default();
        self.deadline = None;
        self.last_emitted = FilterCriteria::default();
    }

    #[must_use]
    pub fn raw(&self) -> &RawFilterInput {
        &self.raw
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
