//! Staging-window boundaries and relative-date resolution.
//!
//! The staged object key embeds the window's boundary labels so daily
//! uploads get a stable, human-readable file name. A boundary passed as a
//! SQL relative-date expression such as
//! `current_date + '18:00-00'::TIMETZ - interval '1 day'` is evaluated to a
//! concrete calendar date at call time; anything else passes through
//! unchanged.

use chrono::{Duration, Local, NaiveDate};

/// Time window labelling one staged batch.
#[derive(Debug, Clone)]
pub struct StageWindow {
    /// Lower boundary label or relative-date expression.
    pub start: String,

    /// Upper boundary label or relative-date expression.
    pub end: String,
}

impl StageWindow {
    /// Create a window from two boundary labels.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Object key for this window: `<table>-<start>_<end>.csv`, with
    /// relative-date boundaries resolved against today.
    pub fn object_key(&self, table: &str) -> String {
        self.object_key_at(table, Local::now().date_naive())
    }

    /// As [`object_key`](StageWindow::object_key), resolving against an
    /// explicit date.
    pub fn object_key_at(&self, table: &str, today: NaiveDate) -> String {
        format!(
            "{}-{}_{}.csv",
            table,
            resolve_boundary(&self.start, today),
            resolve_boundary(&self.end, today)
        )
    }
}

/// Resolve one boundary label.
///
/// Text containing `current_date` together with both an `interval` marker
/// and a `day` unit token evaluates to today minus the day count, taken from
/// the first digit run after the interval marker. `current_date` without the
/// interval pattern resolves to today, as does a day count that would leave
/// the calendar range. Other text passes through unchanged.
pub fn resolve_boundary(text: &str, today: NaiveDate) -> String {
    if !text.contains("current_date") {
        return text.to_string();
    }

    if let Some(interval_idx) = text.find("interval") {
        if text.contains("day") {
            let digits: String = text[interval_idx..]
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            let resolved = digits
                .parse::<i64>()
                .ok()
                .and_then(Duration::try_days)
                .and_then(|d| today.checked_sub_signed(d));
            if let Some(date) = resolved {
                return date.to_string();
            }
        }
    }

    today.to_string()
}
