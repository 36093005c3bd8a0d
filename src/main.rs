use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leadership_board::config::{self, BoardConfig};
use leadership_board::report::{self, ReportStyle};
use leadership_board::scoring::{self, LeaderProfile, SortKey};
use leadership_board::stats::{self, StatsForm, UpsertOutcome};
use leadership_board::week::{self, WeekKey};
use leadership_board::{dataset, BoardError};

#[derive(Parser)]
#[command(name = "leadership-board")]
#[command(about = "Leadership scoring board for church leaders", long_about = None)]
struct Cli {
    /// TOML config file; defaults apply when it does not exist
    #[arg(long, env = "LEADERSHIP_BOARD_CONFIG", default_value = "leadership-board.toml")]
    config: PathBuf,
    /// Church data snapshot (JSON); overrides `data_file` from the config
    #[arg(long, env = "LEADERSHIP_BOARD_DATA")]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct WeekArgs {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    week: Option<u32>,
}

impl WeekArgs {
    fn resolve(self, config: &BoardConfig) -> Result<WeekKey, BoardError> {
        let base = config
            .default_week
            .unwrap_or_else(|| week::current_week(chrono::Utc::now().date_naive()));
        let selected = WeekKey::new(
            self.year.unwrap_or(base.year),
            self.week.unwrap_or(base.week),
        );
        if selected.week == 0 || selected.week > week::WEEKS_PER_YEAR {
            return Err(BoardError::InvalidWeek(selected.week));
        }
        Ok(selected)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demonstration data set to the data file
    Seed {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the ranked leadership board
    Board {
        #[command(flatten)]
        week: WeekArgs,
        #[arg(long, default_value = "overallScore")]
        sort: SortKey,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one leader's full profile
    Profile {
        #[arg(long)]
        leader: u32,
        #[command(flatten)]
        week: WeekArgs,
    },
    /// Write the plain-text leadership report
    Report {
        #[command(flatten)]
        week: WeekArgs,
        #[arg(long, default_value = "overallScore")]
        sort: SortKey,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a messaging link pre-filled with the report
    Share {
        #[command(flatten)]
        week: WeekArgs,
        #[arg(long, default_value = "overallScore")]
        sort: SortKey,
    },
    /// Export the ranked board as CSV
    Export {
        #[command(flatten)]
        week: WeekArgs,
        #[arg(long, default_value = "overallScore")]
        sort: SortKey,
        #[arg(long, default_value = "leadership_board.csv")]
        out: PathBuf,
    },
    /// Save a leader's weekly stats (replaces any existing entry for that week)
    SaveStats {
        #[arg(long)]
        leader: u32,
        #[command(flatten)]
        week: WeekArgs,
        #[arg(long, default_value_t = 0.0)]
        prayer_hours: f64,
        #[arg(long, default_value_t = 0)]
        quiet_time_streak: u32,
        #[arg(long, default_value = "Genesis")]
        book: String,
        #[arg(long, default_value_t = 0)]
        chapters_read: u32,
    },
    /// Upsert weekly stats from a CSV file
    ImportStats {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the selected week and its neighbours
    Week {
        #[command(flatten)]
        week: WeekArgs,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;
    let data_path = cli.data.clone().unwrap_or_else(|| config.data_file.clone());

    match cli.command {
        Commands::Seed { out } => {
            let out = out.unwrap_or(data_path);
            dataset::save(&out, &dataset::seed())?;
            println!("Seed data written to {}.", out.display());
        }
        Commands::Board { week, sort, limit } => {
            let selected = week.resolve(&config)?;
            let data = dataset::load(&data_path)?;
            let profiles = scoring::leader_profiles(&data, selected, sort);

            if profiles.is_empty() {
                println!("No leaders found.");
                return Ok(());
            }

            println!("Leadership board for {selected} (sorted by {sort}):");
            for (index, profile) in profiles.iter().take(limit.unwrap_or(config.limit)).enumerate() {
                print_card(index + 1, profile);
            }
        }
        Commands::Profile { leader, week } => {
            let selected = week.resolve(&config)?;
            let data = dataset::load(&data_path)?;
            let member = data
                .leaders()
                .find(|m| m.id == leader)
                .ok_or(BoardError::UnknownLeader(leader))?;
            let profile = scoring::compute_leader_profile(&data, member, selected);
            let m = &profile.metrics;

            println!("{} ({selected})", profile.name);
            println!("Tier: {}", profile.tier);
            let led: Vec<&str> = data.bacentas_led(leader).map(|b| b.name.as_str()).collect();
            if !led.is_empty() {
                println!("Leads: {}", led.join(", "));
            }
            println!("Score: {}", profile.display_score());
            println!("Visits completed: {}", m.visits_completed);
            println!("Services attended: {}", m.services_attended);
            println!(
                "Sessions taught: {} ({} bacenta, {} school)",
                m.sessions_taught(),
                m.bacenta_meetings_preached,
                m.school_sessions_taught
            );
            println!("Prayer hours: {}", m.prayer_hours);
            println!("Quiet time streak: {} days", m.quiet_time_streak);
            println!(
                "Reading: {} {}/{} ({:.0}%)",
                m.reading_progress.book,
                m.reading_progress.chapters_read,
                m.reading_progress.total_chapters,
                m.reading_percentage()
            );
            if !profile.badges.is_empty() {
                let badges: Vec<&str> = profile.badges.iter().map(|b| b.label()).collect();
                println!("Badges: {}", badges.join(", "));
            }
        }
        Commands::Report { week, sort, out } => {
            let selected = week.resolve(&config)?;
            let data = dataset::load(&data_path)?;
            let profiles = scoring::leader_profiles(&data, selected, sort);
            let text = report::build_report(&profiles, selected, sort, ReportStyle::Plain);
            let out = out.unwrap_or_else(|| PathBuf::from(report::report_file_name(selected)));
            std::fs::write(&out, text)
                .with_context(|| format!("failed to write report {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Share { week, sort } => {
            let selected = week.resolve(&config)?;
            let data = dataset::load(&data_path)?;
            let profiles = scoring::leader_profiles(&data, selected, sort);
            let text = report::build_report(&profiles, selected, sort, ReportStyle::Share);
            println!("{}", report::share_link(&config.share_base_url, &text));
        }
        Commands::Export { week, sort, out } => {
            let selected = week.resolve(&config)?;
            let data = dataset::load(&data_path)?;
            let profiles = scoring::leader_profiles(&data, selected, sort);
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            report::write_csv(&profiles, file)?;
            println!("Exported {} leaders to {}.", profiles.len(), out.display());
        }
        Commands::SaveStats {
            leader,
            week,
            prayer_hours,
            quiet_time_streak,
            book,
            chapters_read,
        } => {
            let selected = week.resolve(&config)?;
            let mut data = dataset::load(&data_path)?;
            let form = StatsForm {
                leader_id: leader,
                week: selected,
                prayer_hours,
                quiet_time_streak,
                book,
                chapters_read,
            };
            let outcome = stats::save_stats(&mut data, form)?;
            dataset::save(&data_path, &data)?;
            match outcome {
                UpsertOutcome::Inserted => println!("Recorded stats for {selected}."),
                UpsertOutcome::Replaced => println!("Updated stats for {selected}."),
            }
        }
        Commands::ImportStats { csv } => {
            let mut data = dataset::load(&data_path)?;
            let summary = dataset::import_stats_csv(&mut data, &csv)?;
            dataset::save(&data_path, &data)?;
            println!(
                "Imported {} new and {} updated weekly stats from {}.",
                summary.inserted,
                summary.replaced,
                csv.display()
            );
        }
        Commands::Week { week } => {
            let selected = week.resolve(&config)?;
            println!("Selected: {selected}");
            println!("Previous: {}", selected.previous());
            println!("Next: {}", selected.next());
        }
    }

    Ok(())
}

fn print_card(rank: usize, profile: &LeaderProfile) {
    let m = &profile.metrics;
    println!(
        "{rank}. {} [{}] score {}",
        profile.name,
        profile.tier,
        profile.display_score()
    );
    println!(
        "   visits {} | prayer {} hrs | sessions {} | services {} | quiet time {} days",
        m.visits_completed,
        m.prayer_hours,
        m.sessions_taught(),
        m.services_attended,
        m.quiet_time_streak
    );
    println!(
        "   reading {} ({:.0}%)",
        m.reading_progress.book,
        m.reading_percentage()
    );
    if !profile.badges.is_empty() {
        let badges: Vec<&str> = profile.badges.iter().map(|b| b.label()).collect();
        println!("   badges: {}", badges.join(", "));
    }
}
