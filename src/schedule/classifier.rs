use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::models::{ObserverContext, PrayerName, PrayerSlot, PrayerStatus};
use crate::prayer_times::PrayerTimeProvider;
use crate::utils::time::resolve_timezone;

/// Fraction of a prayer's window within which observance counts as on time;
/// the remainder of the window is late but not missed.
const ON_TIME_WINDOW_FRACTION: f64 = 0.75;

/// Classify a prayer at the instant `now`.
///
/// Pure in its inputs: the same slot, successor, sunrise, and `now` always
/// produce the same status. The caller evaluates it at the moment the user
/// checks a prayer; a status confirmed by the backend is stored verbatim and
/// never reclassified.
pub fn classify<P: PrayerTimeProvider>(
    provider: &P,
    observer: &ObserverContext,
    current: &PrayerSlot,
    next: Option<&PrayerSlot>,
    sunrise: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<PrayerStatus> {
    let window_end = window_end(provider, observer, current, next, sunrise)?;

    let window_secs = (window_end - current.instant).num_seconds() as f64;
    let ideal_deadline = window_secs * ON_TIME_WINDOW_FRACTION;
    let elapsed_secs = (now - current.instant).num_seconds() as f64;

    // `now == window_end` is still within the window, so the comparison for
    // missed is strict. The two remaining guards are exhaustive for
    // `now <= window_end`.
    let status = if now > window_end {
        PrayerStatus::Missed
    } else if ideal_deadline - elapsed_secs >= 0.0 {
        PrayerStatus::OnTime
    } else {
        PrayerStatus::Late
    };
    Ok(status)
}

/// The instant a prayer's devotional window closes. Fajr closes at sunrise
/// rather than at the next canonical prayer; isha closes at the following
/// day's fajr, which requires asking the provider for date + 1.
fn window_end<P: PrayerTimeProvider>(
    provider: &P,
    observer: &ObserverContext,
    current: &PrayerSlot,
    next: Option<&PrayerSlot>,
    sunrise: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    match current.name {
        PrayerName::Fajr => Ok(sunrise),
        PrayerName::Isha => {
            let tz = resolve_timezone(&observer.timezone);
            let next_day = current
                .instant
                .with_timezone(&tz)
                .date_naive()
                .succ_opt()
                .ok_or_else(|| anyhow!("calendar overflow after {}", current.instant))?;
            Ok(provider.canonical_times(observer, next_day)?.fajr)
        }
        _ => next
            .map(|slot| slot.instant)
            .ok_or_else(|| anyhow!("no following slot for {}", current.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer_times::CanonicalTimes;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::cell::RefCell;

    struct FixedProvider {
        times: CanonicalTimes,
        requested: RefCell<Vec<NaiveDate>>,
    }

    impl FixedProvider {
        fn new(times: CanonicalTimes) -> Self {
            Self { times, requested: RefCell::new(Vec::new()) }
        }
    }

    impl PrayerTimeProvider for FixedProvider {
        fn canonical_times(
            &self,
            _observer: &ObserverContext,
            date: NaiveDate,
        ) -> Result<CanonicalTimes> {
            self.requested.borrow_mut().push(date);
            Ok(self.times)
        }
    }

    fn times() -> CanonicalTimes {
        CanonicalTimes {
            fajr: Utc.with_ymd_and_hms(2026, 3, 11, 4, 30, 0).unwrap(),
            sunrise: Utc.with_ymd_and_hms(2026, 3, 11, 5, 45, 0).unwrap(),
            dhuhr: Utc.with_ymd_and_hms(2026, 3, 11, 12, 5, 0).unwrap(),
            asr: Utc.with_ymd_and_hms(2026, 3, 11, 15, 20, 0).unwrap(),
            maghrib: Utc.with_ymd_and_hms(2026, 3, 11, 18, 10, 0).unwrap(),
            isha: Utc.with_ymd_and_hms(2026, 3, 11, 19, 25, 0).unwrap(),
        }
    }

    fn slot(name: PrayerName, instant: DateTime<Utc>) -> PrayerSlot {
        PrayerSlot {
            id: PrayerSlot::fallback_id(instant),
            name,
            instant,
            status: PrayerStatus::Pending,
        }
    }

    fn observer() -> ObserverContext {
        ObserverContext::default()
    }

    /// Window opens at T=0, closes at T=400s, so the ideal deadline is 300s.
    fn middle_pair() -> (PrayerSlot, PrayerSlot) {
        let open = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let current = slot(PrayerName::Dhuhr, open);
        let next = slot(PrayerName::Asr, open + Duration::seconds(400));
        (current, next)
    }

    #[test]
    fn within_ideal_deadline_is_on_time() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        let now = current.instant + Duration::seconds(250);
        let status =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        assert_eq!(status, PrayerStatus::OnTime);
    }

    #[test]
    fn past_ideal_deadline_but_inside_window_is_late() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        let now = current.instant + Duration::seconds(350);
        let status =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        assert_eq!(status, PrayerStatus::Late);
    }

    #[test]
    fn past_window_end_is_missed() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        let now = current.instant + Duration::seconds(450);
        let status =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        assert_eq!(status, PrayerStatus::Missed);
    }

    #[test]
    fn exactly_at_window_end_is_not_missed() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        let now = current.instant + Duration::seconds(400);
        let status =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        assert_eq!(status, PrayerStatus::Late);
    }

    #[test]
    fn exactly_at_ideal_deadline_is_on_time() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        let now = current.instant + Duration::seconds(300);
        let status =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        assert_eq!(status, PrayerStatus::OnTime);
    }

    #[test]
    fn fajr_window_closes_at_sunrise_not_at_next_slot() {
        let t = times();
        let fajr = slot(PrayerName::Fajr, t.fajr - Duration::days(1));
        let dhuhr = slot(PrayerName::Dhuhr, t.dhuhr - Duration::days(1));
        let sunrise = t.sunrise - Duration::days(1);
        let provider = FixedProvider::new(t);

        // 75% of the fajr-to-sunrise window (4500s) is 3375s
        let on_time = fajr.instant + Duration::seconds(3375);
        let late = fajr.instant + Duration::seconds(3376);
        let missed = sunrise + Duration::seconds(1);

        assert_eq!(
            classify(&provider, &observer(), &fajr, Some(&dhuhr), sunrise, on_time).unwrap(),
            PrayerStatus::OnTime
        );
        assert_eq!(
            classify(&provider, &observer(), &fajr, Some(&dhuhr), sunrise, late).unwrap(),
            PrayerStatus::Late
        );
        assert_eq!(
            classify(&provider, &observer(), &fajr, Some(&dhuhr), sunrise, missed).unwrap(),
            PrayerStatus::Missed
        );
    }

    #[test]
    fn isha_window_closes_at_next_day_fajr() {
        let t = times();
        let isha = slot(
            PrayerName::Isha,
            Utc.with_ymd_and_hms(2026, 3, 10, 19, 0, 0).unwrap(),
        );
        let provider = FixedProvider::new(t);

        // Window runs to 2026-03-11 04:30, 34200s, ideal deadline 25650s
        let on_time = isha.instant + Duration::seconds(25650);
        let late = isha.instant + Duration::seconds(25651);
        let missed = t.fajr + Duration::seconds(1);

        assert_eq!(
            classify(&provider, &observer(), &isha, None, t.sunrise, on_time).unwrap(),
            PrayerStatus::OnTime
        );
        assert_eq!(
            classify(&provider, &observer(), &isha, None, t.sunrise, late).unwrap(),
            PrayerStatus::Late
        );
        assert_eq!(
            classify(&provider, &observer(), &isha, None, t.sunrise, missed).unwrap(),
            PrayerStatus::Missed
        );

        // The provider must have been asked for the following day
        assert!(provider
            .requested
            .borrow()
            .iter()
            .all(|d| *d == NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()));
    }

    #[test]
    fn middle_prayer_without_successor_is_an_error() {
        let (current, _) = middle_pair();
        let provider = FixedProvider::new(times());
        let result = classify(
            &provider,
            &observer(),
            &current,
            None,
            times().sunrise,
            current.instant,
        );
        assert!(result.is_err());
    }

    #[test]
    fn classification_is_idempotent() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        let now = current.instant + Duration::seconds(123);
        let first =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        let second =
            classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                .unwrap();
        assert_eq!(first, second);
    }

    /// Sweep every second of the window and beyond: each offset must land in
    /// exactly the expected variant, which also proves no input falls through
    /// to a pending-style default.
    #[test]
    fn every_offset_maps_to_one_of_three_statuses() {
        let (current, next) = middle_pair();
        let provider = FixedProvider::new(times());
        for offset in 0..=500 {
            let now = current.instant + Duration::seconds(offset);
            let status =
                classify(&provider, &observer(), &current, Some(&next), times().sunrise, now)
                    .unwrap();
            let expected = if offset > 400 {
                PrayerStatus::Missed
            } else if offset <= 300 {
                PrayerStatus::OnTime
            } else {
                PrayerStatus::Late
            };
            assert_eq!(status, expected, "offset {}", offset);
        }
    }
}
