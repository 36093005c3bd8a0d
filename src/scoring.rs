use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;
use crate::metrics::{self, LeaderMetrics};
use crate::models::{ChurchData, Member, MemberId};
use crate::week::WeekKey;

pub const VISIT_WEIGHT: f64 = 10.0;
pub const PRAYER_HOUR_WEIGHT: f64 = 5.0;
pub const SERVICE_WEIGHT: f64 = 3.0;
pub const SESSION_WEIGHT: f64 = 15.0;
pub const QUIET_TIME_WEIGHT: f64 = 2.0;
pub const READING_WEIGHT: f64 = 0.5;

pub const PRAYER_WARRIOR_HOURS: f64 = 40.0;
pub const CONSISTENCY_STREAK_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    FaithfulSteward,
    DevotedShepherd,
    LeadShepherd,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::FaithfulSteward => "Faithful Steward",
            Tier::DevotedShepherd => "Devoted Shepherd",
            Tier::LeadShepherd => "Lead Shepherd",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    PrayerWarrior,
    ConsistencyKing,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::PrayerWarrior => "Prayer Warrior",
            Badge::ConsistencyKing => "Consistency King",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    OverallScore,
    VisitsCompleted,
    PrayerHours,
    SessionsTaught,
    ServicesAttended,
    QuietTimeStreak,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::OverallScore,
        SortKey::VisitsCompleted,
        SortKey::PrayerHours,
        SortKey::SessionsTaught,
        SortKey::ServicesAttended,
        SortKey::QuietTimeStreak,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::OverallScore => "overallScore",
            SortKey::VisitsCompleted => "visitsCompleted",
            SortKey::PrayerHours => "prayerHours",
            SortKey::SessionsTaught => "bacentaSessionsTaught",
            SortKey::ServicesAttended => "servicesAttended",
            SortKey::QuietTimeStreak => "quietTimeStreak",
        }
    }

    pub fn value(self, profile: &LeaderProfile) -> f64 {
        let m = &profile.metrics;
        match self {
            SortKey::OverallScore => profile.score,
            SortKey::VisitsCompleted => f64::from(m.visits_completed),
            SortKey::PrayerHours => m.prayer_hours,
            SortKey::SessionsTaught => f64::from(m.sessions_taught()),
            SortKey::ServicesAttended => f64::from(m.services_attended),
            SortKey::QuietTimeStreak => f64::from(m.quiet_time_streak),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = BoardError;

    /// Accepts the board's camelCase names as well as kebab/snake case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let key = match normalized.as_str() {
            "overallscore" | "score" => SortKey::OverallScore,
            "visitscompleted" | "visits" => SortKey::VisitsCompleted,
            "prayerhours" | "prayer" => SortKey::PrayerHours,
            "bacentasessionstaught" | "sessionstaught" | "sessions" => SortKey::SessionsTaught,
            "servicesattended" | "attendance" => SortKey::ServicesAttended,
            "quiettimestreak" | "quiettime" | "streak" => SortKey::QuietTimeStreak,
            _ => return Err(BoardError::UnknownSortKey(s.to_string())),
        };
        Ok(key)
    }
}

/// Derived view of one leader for the selected week. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderProfile {
    pub leader_id: MemberId,
    pub name: String,
    pub metrics: LeaderMetrics,
    pub score: f64,
    pub tier: Tier,
    pub badges: Vec<Badge>,
}

impl LeaderProfile {
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

pub fn overall_score(metrics: &LeaderMetrics) -> f64 {
    f64::from(metrics.visits_completed) * VISIT_WEIGHT
        + metrics.prayer_hours * PRAYER_HOUR_WEIGHT
        + f64::from(metrics.services_attended) * SERVICE_WEIGHT
        + f64::from(metrics.sessions_taught()) * SESSION_WEIGHT
        + f64::from(metrics.quiet_time_streak) * QUIET_TIME_WEIGHT
        + metrics.reading_percentage() * READING_WEIGHT
}

/// Bands are exclusive at the bottom: exactly 100 or 200 stays in the lower tier.
pub fn classify_tier(score: f64) -> Tier {
    if score > 200.0 {
        Tier::LeadShepherd
    } else if score > 100.0 {
        Tier::DevotedShepherd
    } else {
        Tier::FaithfulSteward
    }
}

pub fn evaluate_badges(prayer_hours: f64, quiet_time_streak: u32) -> Vec<Badge> {
    let mut badges = Vec::new();
    if prayer_hours >= PRAYER_WARRIOR_HOURS {
        badges.push(Badge::PrayerWarrior);
    }
    if quiet_time_streak >= CONSISTENCY_STREAK_DAYS {
        badges.push(Badge::ConsistencyKing);
    }
    badges
}

pub fn compute_leader_profile(data: &ChurchData, leader: &Member, week: WeekKey) -> LeaderProfile {
    let metrics = metrics::extract(data, leader, week);
    let score = overall_score(&metrics);
    let tier = classify_tier(score);
    let badges = evaluate_badges(metrics.prayer_hours, metrics.quiet_time_streak);

    tracing::debug!(
        leader_id = leader.id,
        score,
        tier = tier.label(),
        "computed leader profile"
    );

    LeaderProfile {
        leader_id: leader.id,
        name: leader.name.clone(),
        metrics,
        score,
        tier,
        badges,
    }
}

/// Descending by the key's unrounded value; ties fall back to name, then id.
pub fn rank_profiles(profiles: &mut [LeaderProfile], key: SortKey) {
    profiles.sort_by(|a, b| {
        key.value(b)
            .total_cmp(&key.value(a))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.leader_id.cmp(&b.leader_id))
    });
}

pub fn leader_profiles(data: &ChurchData, week: WeekKey, key: SortKey) -> Vec<LeaderProfile> {
    let mut profiles: Vec<LeaderProfile> = data
        .leaders()
        .map(|leader| compute_leader_profile(data, leader, week))
        .collect();
    rank_profiles(&mut profiles, key);
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::models::ReadingProgress;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn metrics(prayer_hours: f64, quiet_time_streak: u32) -> LeaderMetrics {
        LeaderMetrics {
            visits_completed: 0,
            services_attended: 0,
            bacenta_meetings_preached: 0,
            school_sessions_taught: 0,
            prayer_hours,
            quiet_time_streak,
            reading_progress: ReadingProgress::default(),
        }
    }

    fn profile(id: MemberId, name: &str, score: f64, prayer_hours: f64) -> LeaderProfile {
        LeaderProfile {
            leader_id: id,
            name: name.to_string(),
            metrics: metrics(prayer_hours, 0),
            score,
            tier: classify_tier(score),
            badges: Vec::new(),
        }
    }

    #[test]
    fn weights_apply_to_each_metric() {
        let m = LeaderMetrics {
            visits_completed: 2,
            services_attended: 3,
            bacenta_meetings_preached: 1,
            school_sessions_taught: 1,
            prayer_hours: 4.5,
            quiet_time_streak: 7,
            reading_progress: ReadingProgress {
                book: "Mark".to_string(),
                chapters_read: 8,
                total_chapters: 16,
            },
        };
        let expected = 20.0 + 22.5 + 9.0 + 30.0 + 14.0 + 25.0;
        assert!((overall_score(&m) - expected).abs() < 1e-9);
    }

    #[test]
    fn tier_boundaries_fall_to_lower_band() {
        assert_eq!(classify_tier(0.0), Tier::FaithfulSteward);
        assert_eq!(classify_tier(100.0), Tier::FaithfulSteward);
        assert_eq!(classify_tier(100.0001), Tier::DevotedShepherd);
        assert_eq!(classify_tier(200.0), Tier::DevotedShepherd);
        assert_eq!(classify_tier(200.0001), Tier::LeadShepherd);
    }

    #[test]
    fn badges_are_independent() {
        assert_eq!(evaluate_badges(40.0, 0), vec![Badge::PrayerWarrior]);
        assert_eq!(evaluate_badges(39.9, 30), vec![Badge::ConsistencyKing]);
        assert_eq!(evaluate_badges(10.0, 29), vec![]);

        let both = evaluate_badges(41.0, 45);
        assert_eq!(both.len(), 2);
        assert!(both.contains(&Badge::PrayerWarrior));
        assert!(both.contains(&Badge::ConsistencyKing));
    }

    #[test]
    fn seed_profiles_match_board() {
        let data = dataset::seed();
        let profiles = leader_profiles(&data, WeekKey::new(2024, 30), SortKey::OverallScore);

        let summary: Vec<(&str, i64, Tier)> = profiles
            .iter()
            .map(|p| (p.name.as_str(), p.display_score(), p.tier))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Jane Smith", 377, Tier::LeadShepherd),
                ("Samuel Green", 243, Tier::LeadShepherd),
            ]
        );
        assert_eq!(profiles[0].badges, vec![Badge::PrayerWarrior]);
        assert!(profiles[1].badges.is_empty());
    }

    #[test]
    fn missing_stats_score_only_activity() {
        let data = dataset::seed();
        let jane = data.member(2).unwrap();
        let profile = compute_leader_profile(&data, jane, WeekKey::new(2024, 1));

        // 1 visit, 3 services, 5 sessions taught.
        assert_eq!(profile.score, 10.0 + 9.0 + 75.0);
        assert!(profile.badges.is_empty());
    }

    #[test]
    fn profile_is_deterministic() {
        let data = dataset::seed();
        let jane = data.member(2).unwrap();
        let week = WeekKey::new(2024, 30);
        assert_eq!(
            compute_leader_profile(&data, jane, week),
            compute_leader_profile(&data, jane, week)
        );
    }

    #[test]
    fn sorts_descending_by_selected_key() {
        let mut profiles = vec![
            profile(1, "Ann", 50.0, 10.0),
            profile(2, "Ben", 200.0, 40.0),
            profile(3, "Cal", 125.0, 0.0),
        ];

        rank_profiles(&mut profiles, SortKey::OverallScore);
        let scores: Vec<f64> = profiles.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![200.0, 125.0, 50.0]);

        rank_profiles(&mut profiles, SortKey::PrayerHours);
        let hours: Vec<f64> = profiles.iter().map(|p| p.metrics.prayer_hours).collect();
        assert_eq!(hours, vec![40.0, 10.0, 0.0]);
    }

    #[test]
    fn ties_break_by_name() {
        let mut profiles = vec![
            profile(7, "Zoe", 80.0, 0.0),
            profile(3, "Abe", 80.0, 0.0),
            profile(5, "Abe", 80.0, 0.0),
        ];
        rank_profiles(&mut profiles, SortKey::OverallScore);
        let ids: Vec<MemberId> = profiles.iter().map(|p| p.leader_id).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn unrounded_scores_decide_order() {
        let mut profiles = vec![profile(1, "Ann", 100.4, 0.0), profile(2, "Ben", 100.45, 0.0)];
        rank_profiles(&mut profiles, SortKey::OverallScore);
        assert_eq!(profiles[0].name, "Ben");
        assert_eq!(profiles[0].display_score(), profiles[1].display_score());
    }

    #[test]
    fn sort_keys_parse_from_board_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("prayer-hours".parse::<SortKey>().unwrap(), SortKey::PrayerHours);
        assert!("height".parse::<SortKey>().is_err());
    }

    proptest! {
        #[test]
        fn tier_never_drops_as_score_grows(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_tier(low) <= classify_tier(high));
        }

        #[test]
        fn ranking_is_non_increasing(scores in prop::collection::vec(0.0f64..500.0, 0..20)) {
            let mut profiles: Vec<LeaderProfile> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| profile(i as MemberId, "Leader", *s, 0.0))
                .collect();
            rank_profiles(&mut profiles, SortKey::OverallScore);
            for pair in profiles.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
