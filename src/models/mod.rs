pub mod observer;
pub mod prayer;

pub use observer::ObserverContext;
pub use prayer::{DaySchedule, PrayerName, PrayerRecord, PrayerSlot, PrayerStatus};
