use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// First day of every generation window.
pub const DEFAULT_WINDOW_START: NaiveDate = match NaiveDate::from_ymd_opt(2025, 3, 11) {
    Some(date) => date,
    None => panic!("invalid default window start"),
};

/// Inclusive calendar window that generated dates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window from `start` to the current UTC date.
    pub fn until_today(start: NaiveDate) -> Result<Self> {
        Self::new(start, Utc::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days after `start` that still fall in the window.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
