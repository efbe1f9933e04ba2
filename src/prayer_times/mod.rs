pub mod provider;

pub use provider::{CanonicalTimes, PrayerTimeProvider, SalahProvider, CALC_METHODS};
