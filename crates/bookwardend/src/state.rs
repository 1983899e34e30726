use std::sync::Arc;

use bookwarden_api::{ReservationWindow, Verdict};
use bookwarden_config::{GroupRule, ServerConfig};
use bookwarden_util::{Clock, SystemClock};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Arc<ServerConfig>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            clock,
        }
    }

    /// Evaluate `candidate` with `now` taken in the candidate's own offset
    pub(crate) fn evaluate(
        &self,
        rule: &GroupRule,
        candidate: &ReservationWindow,
        current: &[ReservationWindow],
        weekly_hours_used: f64,
    ) -> Verdict {
        let now = self.clock.now_in(*candidate.start.offset());
        bookwarden_core::evaluate(rule, candidate, current, weekly_hours_used, now)
    }
}
