//! In-memory content calendar.
//!
//! The calendar is an append-only list of scheduled content plans. Entries are
//! never removed; only their status changes.

pub mod strategy;

pub use strategy::{ContentStrategy, PlannedContent, schedule_offset_days};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::ContentPlan;

pub const STATUS_PLANNED: &str = "planned";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_SKIPPED: &str = "skipped";

/// Default look-ahead window for upcoming content
pub const DEFAULT_UPCOMING_DAYS: i64 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// A content plan scheduled on the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub plan: ContentPlan,
    pub scheduled_date: DateTime<Utc>,
    /// Free-form status; not restricted to the STATUS_* constants
    pub status: String,
}

impl CalendarEntry {
    pub fn title(&self) -> &str {
        self.plan.title()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentCalendar {
    entries: Vec<CalendarEntry>,
}

impl ContentCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a plan with status `planned`. Dates are not validated.
    pub fn add(&mut self, plan: ContentPlan, scheduled_date: DateTime<Utc>) {
        debug!("Scheduling '{}' for {}", plan.title(), scheduled_date);
        self.entries.push(CalendarEntry {
            plan,
            scheduled_date,
            status: STATUS_PLANNED.to_string(),
        });
    }

    /// Entries scheduled at or before now + `days`, earliest first.
    ///
    /// There is no lower bound: overdue entries are always included.
    pub fn upcoming(&self, days: i64) -> Vec<CalendarEntry> {
        self.upcoming_at(Utc::now(), days)
    }

    /// [`upcoming`](Self::upcoming) relative to an explicit `now`.
    pub fn upcoming_at(&self, now: DateTime<Utc>, days: i64) -> Vec<CalendarEntry> {
        let cutoff = cutoff(now, days);
        let mut upcoming: Vec<CalendarEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.scheduled_date <= cutoff)
            .cloned()
            .collect();
        // stable: equal dates keep insertion order
        upcoming.sort_by_key(|entry| entry.scheduled_date);
        upcoming
    }

    /// Set the status of the first entry titled `title`.
    ///
    /// Returns false, changing nothing, when no entry has that title.
    pub fn update_status(&mut self, title: &str, status: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.title() == title) {
            Some(entry) => {
                debug!("Status of '{}': {} -> {}", title, entry.status, status);
                entry.status = status.to_string();
                true
            }
            None => false,
        }
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// now + days * 86400 seconds, saturating at the representable range.
fn cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let shifted = TimeDelta::try_seconds(days.saturating_mul(SECONDS_PER_DAY))
        .and_then(|delta| now.checked_add_signed(delta));
    match shifted {
        Some(cutoff) => cutoff,
        None if days >= 0 => DateTime::<Utc>::MAX_UTC,
        None => DateTime::<Utc>::MIN_UTC,
    }
}
