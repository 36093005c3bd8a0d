use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;

use crate::models::{
    Bacenta, BacentaMeeting, ChurchData, Member, MemberId, MemberType, ReadingProgress,
    ServiceAttendance, StudentProgress, Visitation, VisitationStatus, WeeklyLeaderStat,
};
use crate::stats::{StatsForm, UpsertOutcome};
use crate::week::WeekKey;

pub fn load(path: &Path) -> anyhow::Result<ChurchData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    let data: ChurchData = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse data file {}", path.display()))?;
    tracing::debug!(
        members = data.members.len(),
        weekly_stats = data.weekly_stats.len(),
        "loaded church data"
    );
    Ok(data)
}

pub fn save(path: &Path, data: &ChurchData) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data).context("failed to serialize church data")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write data file {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub replaced: usize,
}

/// Upserts weekly stats rows from a CSV file. Each row passes the same
/// checks as the stats form, and total chapters come from the book. Nothing
/// is applied unless every row is valid.
pub fn import_stats_csv(data: &mut ChurchData, csv_path: &Path) -> anyhow::Result<ImportSummary> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        leader_id: MemberId,
        year: i32,
        week: u32,
        prayer_hours: f64,
        quiet_time_streak: u32,
        book: String,
        chapters_read: u32,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let row = result.with_context(|| format!("invalid stats row on line {line}"))?;
        let form = StatsForm {
            leader_id: row.leader_id,
            week: WeekKey::new(row.year, row.week),
            prayer_hours: row.prayer_hours,
            quiet_time_streak: row.quiet_time_streak,
            book: row.book,
            chapters_read: row.chapters_read,
        };
        let record = form
            .into_record(data)
            .with_context(|| format!("rejected stats row on line {line}"))?;
        records.push(record);
    }

    let mut summary = ImportSummary::default();
    for record in records {
        match data.weekly_stats.upsert(record) {
            UpsertOutcome::Inserted => summary.inserted += 1,
            UpsertOutcome::Replaced => summary.replaced += 1,
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        replaced = summary.replaced,
        "imported weekly stats"
    );
    Ok(summary)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn member(id: MemberId, name: &str, member_type: MemberType, groups: &[&str]) -> Member {
    Member {
        id,
        name: name.to_string(),
        member_type,
        groups: groups.iter().map(|g| g.to_string()).collect(),
    }
}

fn stat(
    leader_id: MemberId,
    week: u32,
    prayer_hours: f64,
    quiet_time_streak: u32,
    book: &str,
    chapters_read: u32,
    total_chapters: u32,
) -> WeeklyLeaderStat {
    WeeklyLeaderStat {
        leader_id,
        year: 2024,
        week,
        prayer_hours,
        quiet_time_streak,
        reading_progress: ReadingProgress {
            book: book.to_string(),
            chapters_read,
            total_chapters,
        },
    }
}

/// Demonstration congregation: two leaders with activity around 2024 week 30.
pub fn seed() -> ChurchData {
    let members = vec![
        member(1, "John Doe", MemberType::Member, &["Ushers", "Media Team"]),
        member(
            2,
            "Jane Smith",
            MemberType::Leader,
            &["Bacenta Leader", "Praise and Worship Team"],
        ),
        member(3, "Peter Jones", MemberType::NewConvert, &["First Timer(new convert)"]),
        member(4, "Mary Williams", MemberType::Member, &["Choir"]),
        member(5, "David Brown", MemberType::Member, &["Media Team"]),
        member(6, "Samuel Green", MemberType::Leader, &["Bacenta Leader"]),
        member(7, "Tim Doe", MemberType::Member, &["Kids Church"]),
        member(8, "Sue Smith", MemberType::Member, &["Kids Church"]),
    ];

    let visitations = vec![
        (1, 3, 2, VisitationStatus::Pending),
        (2, 4, 2, VisitationStatus::InProgress),
        (3, 1, 2, VisitationStatus::Completed),
        (4, 5, 6, VisitationStatus::Completed),
    ]
    .into_iter()
    .map(|(id, member_id, assigned_leader_id, status)| Visitation {
        id,
        member_id,
        assigned_leader_id,
        status,
    })
    .collect();

    let mut attendance = BTreeMap::new();
    attendance.insert(
        date(2024, 7, 28),
        ServiceAttendance {
            service_name: "Sunday Morning Service".to_string(),
            present_member_ids: vec![1, 2, 3, 5, 6, 7, 8],
        },
    );
    attendance.insert(
        date(2024, 7, 24),
        ServiceAttendance {
            service_name: "Midweek Bible Study".to_string(),
            present_member_ids: vec![2, 6],
        },
    );
    attendance.insert(
        date(2024, 7, 21),
        ServiceAttendance {
            service_name: "Sunday Morning Service".to_string(),
            present_member_ids: vec![1, 2, 4, 5, 6, 7],
        },
    );

    let bacentas = vec![
        Bacenta {
            id: 1,
            name: "Makhaza Central Bacenta".to_string(),
            leader_id: Some(2),
            meetings: vec![BacentaMeeting {
                date: date(2024, 7, 17),
                preacher: "Jane Smith".to_string(),
            }],
        },
        Bacenta {
            id: 2,
            name: "Harare Square Bacenta".to_string(),
            leader_id: Some(6),
            meetings: vec![BacentaMeeting {
                date: date(2024, 7, 23),
                preacher: "Samuel Green".to_string(),
            }],
        },
    ];

    let mut first_student = vec![false; 10];
    first_student[..3].fill(true);
    let mut second_student = vec![false; 10];
    second_student[0] = true;
    let student_progress = vec![
        StudentProgress {
            student_id: 3,
            teacher_id: 2,
            attendance: first_student,
        },
        StudentProgress {
            student_id: 5,
            teacher_id: 2,
            attendance: second_student,
        },
    ];

    let weekly_stats = vec![
        stat(2, 29, 40.0, 12, "John", 15, 21),
        stat(6, 29, 32.0, 5, "Acts", 8, 28),
        stat(2, 30, 42.0, 15, "John", 18, 21),
        stat(6, 30, 35.0, 8, "Acts", 10, 28),
    ]
    .into_iter()
    .collect();

    ChurchData {
        members,
        visitations,
        attendance,
        bacentas,
        student_progress,
        weekly_stats,
    }
}
