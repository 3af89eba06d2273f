//! Trailing time windows
//!
//! Every window is anchored on a caller-supplied reference instant and keeps
//! rows with `datetime >= now - length`. The lower bound is inclusive.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::domain::Timestamped;

/// The three standard trailing windows
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Window {
    #[serde(rename = "1d")]
    #[strum(serialize = "1d")]
    Day,
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Day, Window::Week, Window::Month];

    pub fn days(self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Inclusive lower bound of the window
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        cutoff(now, self.days())
    }

    pub fn contains(self, ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        ts >= self.cutoff(now)
    }

    /// Assigns `ts` to exactly one non-overlapping period: `Day` for the last
    /// day, `Week` for (7d, 1d], `Month` for (30d, 7d]. Older rows get `None`.
    pub fn partition(ts: DateTime<Utc>, now: DateTime<Utc>) -> Option<Window> {
        Self::ALL.into_iter().find(|w| w.contains(ts, now))
    }
}

pub fn cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// Rows from the last `days` days, keeping input order
pub fn select_trailing_days<R: Timestamped>(rows: &[R], days: i64, now: DateTime<Utc>) -> Vec<&R> {
    let lower = cutoff(now, days);
    rows.iter().filter(|r| r.datetime() >= lower).collect()
}

pub fn select_window<R: Timestamped>(rows: &[R], window: Window, now: DateTime<Utc>) -> Vec<&R> {
    select_trailing_days(rows, window.days(), now)
}

/// Midnight UTC of the day containing `ts`
pub fn truncate_to_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// One value per standard window, computed from the same reference instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trailing<T> {
    pub last_1d: T,
    pub last_7d: T,
    pub last_30d: T,
}

impl<T> Trailing<T> {
    /// Applies `reduce` to the rows of each window in turn
    pub fn compute<'a, R, F>(rows: &[&'a R], now: DateTime<Utc>, mut reduce: F) -> Self
    where
        R: Timestamped,
        F: FnMut(&[&'a R]) -> T,
    {
        let mut per_window = |window: Window| {
            let lower = window.cutoff(now);
            let selected: Vec<&'a R> = rows
                .iter()
                .copied()
                .filter(|r| r.datetime() >= lower)
                .collect();
            reduce(&selected)
        };

        Self {
            last_1d: per_window(Window::Day),
            last_7d: per_window(Window::Week),
            last_30d: per_window(Window::Month),
        }
    }
}
