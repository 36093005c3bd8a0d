use std::fmt::Write;

use serde::Serialize;

use crate::scoring::{LeaderProfile, SortKey};
use crate::week::WeekKey;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://wa.me/";

/// `Share` keeps messaging markup (`*bold*`, `_italic_`); `Plain` is for
/// the downloadable text file and drops only the bold asterisks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Share,
    Plain,
}

impl ReportStyle {
    fn bold(self, text: &str) -> String {
        match self {
            ReportStyle::Share => format!("*{text}*"),
            ReportStyle::Plain => text.to_string(),
        }
    }
}

pub fn build_report(
    profiles: &[LeaderProfile],
    week: WeekKey,
    sort_key: SortKey,
    style: ReportStyle,
) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{}",
        style.bold(&format!(
            "Leadership Board Report - {} Week {}",
            week.year, week.week
        ))
    );
    let _ = writeln!(output, "_Sorted by: {sort_key}_");
    let _ = writeln!(output);

    if profiles.is_empty() {
        let _ = writeln!(output, "No leaders found.");
        return output;
    }

    for (index, profile) in profiles.iter().enumerate() {
        let _ = writeln!(
            output,
            "{} ({} pts)",
            style.bold(&format!("{}. {}", index + 1, profile.name)),
            profile.display_score()
        );
        let _ = writeln!(output, "  - Prayer: {} hrs", profile.metrics.prayer_hours);
        let _ = writeln!(
            output,
            "  - Q.T. Streak: {} days",
            profile.metrics.quiet_time_streak
        );
        let _ = writeln!(output, "  - Visits: {}", profile.metrics.visits_completed);
        let _ = writeln!(output, "  - Attendance: {}", profile.metrics.services_attended);
        let _ = writeln!(output);
    }

    output
}

pub fn report_file_name(week: WeekKey) -> String {
    format!("leadership_report_{}_W{}.txt", week.year, week.week)
}

/// Compose link for a messaging app with the report pre-filled.
pub fn share_link(base_url: &str, text: &str) -> String {
    format!("{base_url}?text={}", encode_uri_component(text))
}

/// Percent-encodes UTF-8 bytes, leaving the same characters untouched as
/// JavaScript's `encodeURIComponent`.
pub fn encode_uri_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(char::from(byte)),
            _ => {
                let _ = write!(encoded, "%{byte:02X}");
            }
        }
    }
    encoded
}

#[derive(Debug, Serialize)]
struct BoardRow<'a> {
    rank: usize,
    leader_id: u32,
    name: &'a str,
    tier: &'static str,
    score: i64,
    visits_completed: u32,
    services_attended: u32,
    sessions_taught: u32,
    prayer_hours: f64,
    quiet_time_streak: u32,
    reading_book: &'a str,
    reading_percentage: String,
    badges: String,
}

/// Writes the ranked board as CSV, one row per leader in rank order.
pub fn write_csv<W: std::io::Write>(profiles: &[LeaderProfile], out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    for (index, profile) in profiles.iter().enumerate() {
        let badges: Vec<&str> = profile.badges.iter().map(|b| b.label()).collect();
        writer.serialize(BoardRow {
            rank: index + 1,
            leader_id: profile.leader_id,
            name: &profile.name,
            tier: profile.tier.label(),
            score: profile.display_score(),
            visits_completed: profile.metrics.visits_completed,
            services_attended: profile.metrics.services_attended,
            sessions_taught: profile.metrics.sessions_taught(),
            prayer_hours: profile.metrics.prayer_hours,
            quiet_time_streak: profile.metrics.quiet_time_streak,
            reading_book: &profile.metrics.reading_progress.book,
            reading_percentage: format!("{:.0}", profile.metrics.reading_percentage()),
            badges: badges.join("; "),
        })?;
    }

    writer.flush()?;
    tracing::info!(rows = profiles.len(), "exported leadership board csv");
    Ok(())
}
