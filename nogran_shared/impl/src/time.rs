use chrono::{DateTime, SubsecRound, Utc};
use nogran_shared_contracts::time::TimeService;
use nogran_utils::trace_instrument;

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    /// Returns the current time truncated to microseconds, the resolution of
    /// postgres timestamps.
    #[trace_instrument(skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}
