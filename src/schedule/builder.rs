use anyhow::Result;
use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use crate::models::{DaySchedule, ObserverContext, PrayerRecord, PrayerSlot, PrayerStatus};
use crate::prayer_times::PrayerTimeProvider;
use crate::utils::time::{current_time_in, resolve_timezone};

/// A freshly built schedule together with the reference instants the
/// classifier needs: the moment the build ran and the day's sunrise.
#[derive(Debug, Clone)]
pub struct ScheduleBuild {
    pub schedule: DaySchedule,
    pub now: DateTime<Tz>,
    pub sunrise: DateTime<chrono::Utc>,
}

/// Build today's schedule from freshly computed canonical instants and the
/// records the backend already holds for the day.
///
/// Returns `Ok(None)` when `records` is absent (nothing fetched yet) or when
/// the first record's day no longer matches the fajr instant's day — the
/// device clock crossed midnight while the session was open, and the caller
/// must discard the records and refetch. Explicitly empty records yield an
/// empty schedule, which is a different state from `None`.
pub fn build_schedule<P: PrayerTimeProvider>(
    provider: &P,
    observer: &ObserverContext,
    records: Option<&[PrayerRecord]>,
) -> Result<Option<ScheduleBuild>> {
    let Some(records) = records else {
        return Ok(None);
    };

    let tz = resolve_timezone(&observer.timezone);
    let now = current_time_in(&observer.timezone);
    let times = provider.canonical_times(observer, now.date_naive())?;

    let fajr_local = times.fajr.with_timezone(&tz);
    if let Some(first) = records.first() {
        if first.day != fajr_local.day() {
            return Ok(None);
        }
    }

    let day = fajr_local.date_naive();
    if records.is_empty() {
        let schedule = DaySchedule { day, slots: Vec::new() };
        return Ok(Some(ScheduleBuild { schedule, now, sunrise: times.sunrise }));
    }

    let mut slots: Vec<PrayerSlot> = times
        .ordered()
        .into_iter()
        .map(|(name, instant)| PrayerSlot {
            id: PrayerSlot::fallback_id(instant),
            name,
            instant,
            status: PrayerStatus::Pending,
        })
        .collect();

    for record in records {
        if let Some(slot) = slots.iter_mut().find(|slot| slot.name == record.name) {
            slot.id = record.id.clone();
            slot.status = record.status.clone();
        }
    }

    let schedule = DaySchedule { day, slots };
    Ok(Some(ScheduleBuild { schedule, now, sunrise: times.sunrise }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use crate::prayer_times::CanonicalTimes;
    use anyhow::Result;
    use chrono::{NaiveDate, TimeZone, Utc};

    struct FixedProvider {
        times: CanonicalTimes,
    }

    impl PrayerTimeProvider for FixedProvider {
        fn canonical_times(
            &self,
            _observer: &ObserverContext,
            _date: NaiveDate,
        ) -> Result<CanonicalTimes> {
            Ok(self.times)
        }
    }

    fn provider() -> FixedProvider {
        FixedProvider {
            times: CanonicalTimes {
                fajr: Utc.with_ymd_and_hms(2026, 3, 10, 4, 30, 0).unwrap(),
                sunrise: Utc.with_ymd_and_hms(2026, 3, 10, 5, 45, 0).unwrap(),
                dhuhr: Utc.with_ymd_and_hms(2026, 3, 10, 12, 5, 0).unwrap(),
                asr: Utc.with_ymd_and_hms(2026, 3, 10, 15, 20, 0).unwrap(),
                maghrib: Utc.with_ymd_and_hms(2026, 3, 10, 18, 10, 0).unwrap(),
                isha: Utc.with_ymd_and_hms(2026, 3, 10, 19, 25, 0).unwrap(),
            },
        }
    }

    fn observer() -> ObserverContext {
        ObserverContext::default()
    }

    fn record(id: &str, name: PrayerName, status: PrayerStatus, day: u32) -> PrayerRecord {
        PrayerRecord { id: id.to_string(), name, status, day }
    }

    #[test]
    fn no_records_yields_none() {
        let build = build_schedule(&provider(), &observer(), None).unwrap();
        assert!(build.is_none());
    }

    #[test]
    fn empty_records_yield_empty_schedule() {
        let build = build_schedule(&provider(), &observer(), Some(&[]))
            .unwrap()
            .expect("empty records must still produce a schedule");
        assert!(build.schedule.is_empty());
        assert_eq!(
            build.schedule.day,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
    }

    #[test]
    fn day_mismatch_invalidates() {
        let records = [record("p1", PrayerName::Fajr, PrayerStatus::OnTime, 9)];
        let build = build_schedule(&provider(), &observer(), Some(&records)).unwrap();
        assert!(build.is_none());
    }

    #[test]
    fn slots_follow_canonical_order_ascending() {
        let records = [record("p1", PrayerName::Fajr, PrayerStatus::OnTime, 10)];
        let build = build_schedule(&provider(), &observer(), Some(&records))
            .unwrap()
            .unwrap();
        let slots = &build.schedule.slots;
        assert_eq!(slots.len(), 5);

        let names: Vec<PrayerName> = slots.iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, PrayerName::all());
        for pair in slots.windows(2) {
            assert!(pair[0].instant < pair[1].instant);
        }
    }

    #[test]
    fn records_overwrite_matching_slots_only() {
        let records = [
            record("p1", PrayerName::Fajr, PrayerStatus::OnTime, 10),
            record("p4", PrayerName::Maghrib, PrayerStatus::Late, 10),
        ];
        let build = build_schedule(&provider(), &observer(), Some(&records))
            .unwrap()
            .unwrap();
        let slots = &build.schedule.slots;

        assert_eq!(slots[0].id, "p1");
        assert_eq!(slots[0].status, PrayerStatus::OnTime);
        assert_eq!(slots[3].id, "p4");
        assert_eq!(slots[3].status, PrayerStatus::Late);

        // Untouched slots keep the deterministic fallback id and stay pending
        let dhuhr = Utc.with_ymd_and_hms(2026, 3, 10, 12, 5, 0).unwrap();
        assert_eq!(slots[1].id, PrayerSlot::fallback_id(dhuhr));
        assert_eq!(slots[1].status, PrayerStatus::Pending);
    }

    #[test]
    fn build_exposes_sunrise_for_the_classifier() {
        let build = build_schedule(&provider(), &observer(), Some(&[]))
            .unwrap()
            .unwrap();
        assert_eq!(
            build.sunrise,
            Utc.with_ymd_and_hms(2026, 3, 10, 5, 45, 0).unwrap()
        );
    }
}
