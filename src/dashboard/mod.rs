use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::backend::{BackendError, ObservanceBackend};
use crate::models::{DaySchedule, ObserverContext, PrayerRecord, PrayerStatus};
use crate::prayer_times::PrayerTimeProvider;
use crate::schedule::{build_schedule, classify};
use crate::state::{ObservanceState, ProposeError};
use crate::utils::time::{current_time_in, resolve_timezone};

/// Toast-equivalent side channel for user-facing outcomes. The dashboard
/// reports every success and failure here instead of propagating errors.
pub trait Notifier {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// The surface the presentation layer talks to: loading flag, reference
/// date, sunrise instant, the day schedule, and the imperative
/// `check_prayer` operation.
pub struct PrayerDashboard<P, B, N> {
    provider: P,
    backend: B,
    notifier: N,
    observer: ObserverContext,
    state: ObservanceState,
    is_loading: bool,
    current_date: Option<DateTime<Tz>>,
    sunrise_date: Option<DateTime<Utc>>,
}

impl<P, B, N> PrayerDashboard<P, B, N>
where
    P: PrayerTimeProvider,
    B: ObservanceBackend,
    N: Notifier,
{
    pub fn new(provider: P, backend: B, notifier: N, observer: ObserverContext) -> Self {
        Self {
            provider,
            backend,
            notifier,
            observer,
            state: ObservanceState::new(),
            is_loading: false,
            current_date: None,
            sunrise_date: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn current_date(&self) -> Option<DateTime<Tz>> {
        self.current_date
    }

    pub fn sunrise_date(&self) -> Option<DateTime<Utc>> {
        self.sunrise_date
    }

    pub fn schedule(&self) -> Option<&DaySchedule> {
        self.state.schedule()
    }

    pub fn month_records(&self) -> Option<&[PrayerRecord]> {
        self.state.month_records()
    }

    pub fn observer(&self) -> &ObserverContext {
        &self.observer
    }

    /// Fetch the day's records if they are not loaded yet and derive the
    /// schedule. A build that detects day rollover discards the records and
    /// refetches once; backend failures are reported through the notifier
    /// and leave the schedule unset.
    pub async fn refresh(&mut self) -> Result<()> {
        for _ in 0..2 {
            if self.state.day_records().is_none() {
                let today = current_time_in(&self.observer.timezone).date_naive();
                let times = self.provider.canonical_times(&self.observer, today)?;
                let fajr_local = times.fajr.with_timezone(&resolve_timezone(&self.observer.timezone));

                self.is_loading = true;
                let fetched = self
                    .backend
                    .fetch_day(fajr_local.year(), fajr_local.month(), fajr_local.day())
                    .await;
                self.is_loading = false;

                match fetched {
                    Ok(records) => self.state.set_day_records(records),
                    Err(err) => {
                        self.report_fetch_failure(err);
                        return Ok(());
                    }
                }
            }

            match build_schedule(&self.provider, &self.observer, self.state.day_records())? {
                Some(build) => {
                    self.current_date = Some(build.now);
                    self.sunrise_date = Some(build.sunrise);
                    self.state.set_schedule(build.schedule);
                    return Ok(());
                }
                None => self.state.invalidate_day(),
            }
        }
        Ok(())
    }

    /// Fetch the current month's records into the full-list view.
    pub async fn load_month(&mut self) -> Result<()> {
        let local = current_time_in(&self.observer.timezone);
        self.load_month_of(local.year(), local.month()).await
    }

    pub async fn load_month_of(&mut self, year: i32, month: u32) -> Result<()> {
        self.is_loading = true;
        let fetched = self.backend.fetch_month(year, month).await;
        self.is_loading = false;

        match fetched {
            Ok(records) => self.state.set_month_records(records),
            Err(err) => self.report_fetch_failure(err),
        }
        Ok(())
    }

    /// Classify the slot at `index` against the current moment. This is the
    /// status to submit when the user checks the prayer right now.
    pub fn classify_slot(&self, index: usize) -> Result<PrayerStatus> {
        let schedule = self.state.schedule().context("schedule is not loaded")?;
        let current = schedule
            .slots
            .get(index)
            .with_context(|| format!("no prayer slot at index {}", index))?;
        let next = schedule.slots.get(index + 1);
        let sunrise = self.sunrise_date.context("sunrise instant is not available")?;
        let now = current_time_in(&self.observer.timezone).to_utc();
        classify(&self.provider, &self.observer, current, next, sunrise, now)
    }

    /// Record a status change for the slot with the given id. The local
    /// views mutate only after the backend confirms; every failure leaves
    /// them untouched and is reported through the notifier.
    pub async fn check_prayer(&mut self, id: &str, status: PrayerStatus) {
        let change = match self.state.propose(id, status.clone()) {
            Ok(change) => change,
            Err(ProposeError::SlotBusy) => {
                self.notifier
                    .failure("A change for this prayer is already in progress.");
                return;
            }
        };

        self.is_loading = true;
        let result = self.backend.update_status(id, status).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.state.confirm(change);
                self.notifier.success("Prayer check recorded.");
            }
            Err(err) => {
                self.state.reject(change);
                self.report_update_failure(err);
            }
        }
    }

    fn report_fetch_failure(&self, err: BackendError) {
        match err {
            BackendError::BadRequest(message) => {
                log::error!("invalid query params: {}", message);
                self.notifier.failure("Could not load today's prayers.");
            }
            err => {
                log::error!("fetching prayer records failed: {:#}", anyhow::Error::from(err));
                self.notifier
                    .failure("Could not load today's prayers. Please try again.");
            }
        }
    }

    fn report_update_failure(&self, err: BackendError) {
        match err {
            BackendError::BadRequest(message) => {
                log::error!("invalid request body: {}", message);
                self.notifier.failure("Could not record the prayer check.");
            }
            BackendError::NotFound => {
                self.notifier
                    .failure("Could not record the prayer check. The prayer was not found.");
            }
            err => {
                log::error!("updating prayer status failed: {:#}", anyhow::Error::from(err));
                self.notifier
                    .failure("Could not record the prayer check. Please try again.");
            }
        }
    }
}
