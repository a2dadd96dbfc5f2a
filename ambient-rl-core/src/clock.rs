//! Hour-of-day source for the observe path
//!
//! The reference timezone is fixed at UTC+1 (the deployment site's zone,
//! which observes no daylight saving). Feedback and override paths take
//! the hour as an explicit parameter instead; both sides of a transition
//! recompute "now" independently, by design.

use chrono::{FixedOffset, Timelike, Utc};

/// Offset of the reference timezone from UTC, in seconds
pub const REFERENCE_TZ_OFFSET_SECS: i32 = 3600;

/// Source of the current hour of day in the reference timezone
pub trait Clock: Send + Sync {
    /// Current hour of day, 0..24
    fn hour_of_day(&self) -> u8;
}

/// Wall-clock hours in the fixed reference timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour_of_day(&self) -> u8 {
        let offset =
            FixedOffset::east_opt(REFERENCE_TZ_OFFSET_SECS).expect("reference offset is in range");
        Utc::now().with_timezone(&offset).hour() as u8
    }
}

/// A clock pinned to one hour, for tests and simulations
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u8);

impl Clock for FixedClock {
    fn hour_of_day(&self) -> u8 {
        self.0
    }
}
