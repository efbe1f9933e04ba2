pub mod backend;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod prayer_times;
pub mod schedule;
pub mod state;
pub mod utils;

pub use config::AppConfig;
pub use dashboard::{Notifier, PrayerDashboard};
pub use models::{DaySchedule, ObserverContext, PrayerName, PrayerRecord, PrayerSlot, PrayerStatus};
