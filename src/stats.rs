use serde::{Deserialize, Serialize};

use crate::bible;
use crate::error::BoardError;
use crate::models::{ChurchData, MemberId, ReadingProgress, WeeklyLeaderStat};
use crate::week::{WeekKey, WEEKS_PER_YEAR};

/// Sparse per-leader, per-week stats. At most one record per
/// (leader, year, week); records are never removed. Loading goes through
/// `upsert`, so a later duplicate in a snapshot wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WeeklyLeaderStat>", into = "Vec<WeeklyLeaderStat>")]
pub struct WeeklyStatsStore {
    records: Vec<WeeklyLeaderStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

impl WeeklyStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, leader_id: MemberId, week: WeekKey) -> Option<&WeeklyLeaderStat> {
        self.records
            .iter()
            .find(|s| s.leader_id == leader_id && s.year == week.year && s.week == week.week)
    }

    pub fn upsert(&mut self, record: WeeklyLeaderStat) -> UpsertOutcome {
        let existing = self.records.iter_mut().find(|s| {
            s.leader_id == record.leader_id && s.year == record.year && s.week == record.week
        });

        match existing {
            Some(slot) => {
                tracing::info!(
                    leader_id = record.leader_id,
                    year = record.year,
                    week = record.week,
                    "replacing weekly stats"
                );
                *slot = record;
                UpsertOutcome::Replaced
            }
            None => {
                tracing::info!(
                    leader_id = record.leader_id,
                    year = record.year,
                    week = record.week,
                    "recording new weekly stats"
                );
                self.records.push(record);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeeklyLeaderStat> {
        self.records.iter()
    }
}

impl FromIterator<WeeklyLeaderStat> for WeeklyStatsStore {
    fn from_iter<I: IntoIterator<Item = WeeklyLeaderStat>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.upsert(record);
        }
        store
    }
}

impl From<Vec<WeeklyLeaderStat>> for WeeklyStatsStore {
    fn from(records: Vec<WeeklyLeaderStat>) -> Self {
        records.into_iter().collect()
    }
}

impl From<WeeklyStatsStore> for Vec<WeeklyLeaderStat> {
    fn from(store: WeeklyStatsStore) -> Self {
        store.records
    }
}

/// Values submitted from the "edit stats" form for one leader and week.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsForm {
    pub leader_id: MemberId,
    pub week: WeekKey,
    pub prayer_hours: f64,
    pub quiet_time_streak: u32,
    pub book: String,
    pub chapters_read: u32,
}

impl StatsForm {
    /// Checks the form against the directory and the book catalogue and
    /// builds the record to save. Total chapters always come from the book.
    pub fn into_record(self, data: &ChurchData) -> Result<WeeklyLeaderStat, BoardError> {
        if !data.leaders().any(|l| l.id == self.leader_id) {
            return Err(BoardError::UnknownLeader(self.leader_id));
        }
        if self.week.week == 0 || self.week.week > WEEKS_PER_YEAR {
            return Err(BoardError::InvalidWeek(self.week.week));
        }
        if !self.prayer_hours.is_finite() || self.prayer_hours < 0.0 {
            return Err(BoardError::InvalidPrayerHours(self.prayer_hours));
        }

        let book = bible::canonical_name(&self.book)
            .ok_or_else(|| BoardError::UnknownBook(self.book.clone()))?;
        let total_chapters = bible::total_chapters(book).unwrap_or(1);
        if self.chapters_read > total_chapters {
            return Err(BoardError::ChaptersOutOfRange {
                book: book.to_string(),
                read: self.chapters_read,
                total: total_chapters,
            });
        }

        Ok(WeeklyLeaderStat {
            leader_id: self.leader_id,
            year: self.week.year,
            week: self.week.week,
            prayer_hours: self.prayer_hours,
            quiet_time_streak: self.quiet_time_streak,
            reading_progress: ReadingProgress {
                book: book.to_string(),
                chapters_read: self.chapters_read,
                total_chapters,
            },
        })
    }
}

/// Validates the form and upserts the result into the snapshot's store.
pub fn save_stats(data: &mut ChurchData, form: StatsForm) -> Result<UpsertOutcome, BoardError> {
    let record = form.into_record(data)?;
    Ok(data.weekly_stats.upsert(record))
}
