use chrono::{DateTime, Utc};
use portfolio_shared_contracts::time::TimeService;

/// System clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[tracing::instrument(level = "trace", ret, skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
