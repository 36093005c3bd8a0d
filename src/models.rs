use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::WeeklyStatsStore;

pub type MemberId = u32;

/// Group whose members count as leaders regardless of member type.
pub const LEADER_GROUP: &str = "Bacenta Leader";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberType {
    #[serde(rename = "New Convert")]
    NewConvert,
    Member,
    Leader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub member_type: MemberType,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Member {
    pub fn is_leader(&self) -> bool {
        self.member_type == MemberType::Leader || self.groups.iter().any(|g| g == LEADER_GROUP)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitationStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitation {
    pub id: u32,
    pub member_id: MemberId,
    pub assigned_leader_id: MemberId,
    pub status: VisitationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAttendance {
    pub service_name: String,
    #[serde(default)]
    pub present_member_ids: Vec<MemberId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacentaMeeting {
    pub date: NaiveDate,
    pub preacher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bacenta {
    pub id: u32,
    pub name: String,
    pub leader_id: Option<MemberId>,
    #[serde(default)]
    pub meetings: Vec<BacentaMeeting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProgress {
    pub student_id: MemberId,
    pub teacher_id: MemberId,
    /// One entry per curriculum week.
    #[serde(default)]
    pub attendance: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub book: String,
    pub chapters_read: u32,
    pub total_chapters: u32,
}

impl ReadingProgress {
    pub fn percentage(&self) -> f64 {
        if self.total_chapters == 0 {
            return 0.0;
        }
        f64::from(self.chapters_read) / f64::from(self.total_chapters) * 100.0
    }
}

impl Default for ReadingProgress {
    fn default() -> Self {
        Self {
            book: "N/A".to_string(),
            chapters_read: 0,
            total_chapters: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyLeaderStat {
    pub leader_id: MemberId,
    pub year: i32,
    pub week: u32,
    pub prayer_hours: f64,
    pub quiet_time_streak: u32,
    pub reading_progress: ReadingProgress,
}

/// Everything the leadership board reads, plus the weekly stats it edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChurchData {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub visitations: Vec<Visitation>,
    #[serde(default)]
    pub attendance: BTreeMap<NaiveDate, ServiceAttendance>,
    #[serde(default)]
    pub bacentas: Vec<Bacenta>,
    #[serde(default)]
    pub student_progress: Vec<StudentProgress>,
    #[serde(default)]
    pub weekly_stats: WeeklyStatsStore,
}

impl ChurchData {
    pub fn leaders(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_leader())
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn bacentas_led(&self, leader_id: MemberId) -> impl Iterator<Item = &Bacenta> {
        self.bacentas
            .iter()
            .filter(move |b| b.leader_id == Some(leader_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(member_type: MemberType, groups: &[&str]) -> Member {
        Member {
            id: 1,
            name: "Jane Smith".to_string(),
            member_type,
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn leader_by_type_or_group() {
        assert!(member(MemberType::Leader, &[]).is_leader());
        assert!(member(MemberType::Member, &["Choir", "Bacenta Leader"]).is_leader());
        assert!(!member(MemberType::Member, &["Basonta Leader"]).is_leader());
        assert!(!member(MemberType::NewConvert, &[]).is_leader());
    }

    #[test]
    fn reading_percentage_guards_zero_total() {
        let progress = ReadingProgress {
            book: "John".to_string(),
            chapters_read: 3,
            total_chapters: 0,
        };
        assert_eq!(progress.percentage(), 0.0);
        assert_eq!(ReadingProgress::default().percentage(), 0.0);
    }

    #[test]
    fn bacentas_led_matches_leader_id() {
        let bacenta = |id: u32, leader_id: Option<MemberId>| Bacenta {
            id,
            name: format!("Bacenta {id}"),
            leader_id,
            meetings: vec![],
        };
        let data = ChurchData {
            bacentas: vec![bacenta(1, Some(2)), bacenta(2, None), bacenta(3, Some(2)), bacenta(4, Some(6))],
            ..ChurchData::default()
        };

        let led: Vec<u32> = data.bacentas_led(2).map(|b| b.id).collect();
        assert_eq!(led, vec![1, 3]);
        assert_eq!(data.bacentas_led(9).count(), 0);
    }

    #[test]
    fn member_types_use_display_names_in_json() {
        let json = serde_json::to_string(&MemberType::NewConvert).unwrap();
        assert_eq!(json, "\"New Convert\"");
        let status: VisitationStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, VisitationStatus::InProgress);
    }
}
