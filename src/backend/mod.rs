pub mod client;
pub mod error;

pub use client::ObservanceClient;
pub use error::BackendError;

use crate::models::{PrayerRecord, PrayerStatus};

/// The observance backend as the engine consumes it. Fetches are read-only;
/// `update_status` is the only mutation and resolves to plain success or a
/// classified failure.
#[allow(async_fn_in_trait)]
pub trait ObservanceBackend {
    async fn fetch_day(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Vec<PrayerRecord>, BackendError>;

    async fn fetch_month(&self, year: i32, month: u32) -> Result<Vec<PrayerRecord>, BackendError>;

    async fn update_status(&self, id: &str, status: PrayerStatus) -> Result<(), BackendError>;
}
