//! Raw per-leader counts pulled from the collaborator collections.
//!
//! Every extractor is total: missing records count as zero.

use crate::models::{ChurchData, Member, ReadingProgress, VisitationStatus};
use crate::week::WeekKey;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderMetrics {
    pub visits_completed: u32,
    pub services_attended: u32,
    /// Bacenta meetings where this leader is logged as preacher.
    pub bacenta_meetings_preached: u32,
    /// Curriculum weeks marked attended for students this leader teaches.
    pub school_sessions_taught: u32,
    pub prayer_hours: f64,
    pub quiet_time_streak: u32,
    pub reading_progress: ReadingProgress,
}

impl LeaderMetrics {
    /// Preaching and classroom sessions counted as one figure.
    pub fn sessions_taught(&self) -> u32 {
        self.bacenta_meetings_preached + self.school_sessions_taught
    }

    pub fn reading_percentage(&self) -> f64 {
        self.reading_progress.percentage()
    }
}

pub fn visits_completed(data: &ChurchData, leader: &Member) -> u32 {
    count(
        data.visitations
            .iter()
            .filter(|v| v.assigned_leader_id == leader.id && v.status == VisitationStatus::Completed),
    )
}

pub fn services_attended(data: &ChurchData, leader: &Member) -> u32 {
    count(
        data.attendance
            .values()
            .filter(|record| record.present_member_ids.contains(&leader.id)),
    )
}

/// Matches on the preacher's name, since meeting logs store names not ids.
pub fn bacenta_meetings_preached(data: &ChurchData, leader: &Member) -> u32 {
    data.bacentas
        .iter()
        .map(|b| count(b.meetings.iter().filter(|m| m.preacher == leader.name)))
        .sum()
}

pub fn school_sessions_taught(data: &ChurchData, leader: &Member) -> u32 {
    data.student_progress
        .iter()
        .filter(|p| p.teacher_id == leader.id)
        .map(|p| count(p.attendance.iter().filter(|attended| **attended)))
        .sum()
}

pub fn extract(data: &ChurchData, leader: &Member, week: WeekKey) -> LeaderMetrics {
    let weekly = data.weekly_stats.get(leader.id, week);

    LeaderMetrics {
        visits_completed: visits_completed(data, leader),
        services_attended: services_attended(data, leader),
        bacenta_meetings_preached: bacenta_meetings_preached(data, leader),
        school_sessions_taught: school_sessions_taught(data, leader),
        prayer_hours: weekly.map(|s| s.prayer_hours).unwrap_or(0.0),
        quiet_time_streak: weekly.map(|s| s.quiet_time_streak).unwrap_or(0),
        reading_progress: weekly
            .map(|s| s.reading_progress.clone())
            .unwrap_or_default(),
    }
}

fn count<I: Iterator>(iter: I) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}
