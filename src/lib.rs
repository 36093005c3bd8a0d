//! Leadership board for a church dashboard: derives per-leader scores,
//! tiers and badges from directory, visitation, attendance, small-group and
//! school records, and renders the ranked board as text, CSV or a share link.

pub mod bible;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod report;
pub mod scoring;
pub mod stats;
pub mod week;

pub use error::BoardError;
pub use models::ChurchData;
pub use scoring::{Badge, LeaderProfile, SortKey, Tier};
pub use week::WeekKey;
