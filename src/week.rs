use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const WEEKS_PER_YEAR: u32 = 52;

/// A (year, week) pair selecting which weekly stats feed the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    pub fn previous(self) -> Self {
        if self.week > 1 {
            Self::new(self.year, self.week - 1)
        } else {
            Self::new(self.year - 1, WEEKS_PER_YEAR)
        }
    }

    pub fn next(self) -> Self {
        if self.week < WEEKS_PER_YEAR {
            Self::new(self.year, self.week + 1)
        } else {
            Self::new(self.year + 1, 1)
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Week {}", self.year, self.week)
    }
}

/// Week number counted from the Sunday-aligned start of January 1st.
/// The last days of December can spill into a 53rd or 54th partial week;
/// those fold into week 52 so the result is always selectable.
pub fn current_week(today: NaiveDate) -> WeekKey {
    let jan_first = today.with_ordinal(1).unwrap_or(today);
    let offset = jan_first.weekday().num_days_from_sunday();
    let week = (today.ordinal0() + offset + 1).div_ceil(7);
    WeekKey::new(today.year(), week.min(WEEKS_PER_YEAR))
}
