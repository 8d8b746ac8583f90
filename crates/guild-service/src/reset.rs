//! Reset-time gating for the ticket log
//!
//! Ticket counters are only meaningful right before a guild's daily reset.
//! The next reset is today's reset time, or tomorrow's when today's has
//! already passed; the log may be written in the window that ends there.

use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Next reset at or after `now`
pub fn next_reset(now: NaiveDateTime, reset_time: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(reset_time);
    if today < now {
        today + Duration::days(1)
    } else {
        today
    }
}

/// Whether `now` lies in `[next_reset - window, next_reset]`
pub fn is_around_reset(now: NaiveDateTime, reset_time: NaiveTime, window: Duration) -> bool {
    let reset = next_reset(now, reset_time);
    reset - window <= now && now <= reset
}
