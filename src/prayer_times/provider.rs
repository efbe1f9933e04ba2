use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use salah::prelude::*;

use crate::models::{ObserverContext, PrayerName};

/// The six astronomically-derived instants for one location and date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalTimes {
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

impl CanonicalTimes {
    pub fn for_prayer(&self, name: &PrayerName) -> DateTime<Utc> {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    /// The five prayer instants in canonical order (sunrise excluded).
    pub fn ordered(&self) -> Vec<(PrayerName, DateTime<Utc>)> {
        PrayerName::all()
            .into_iter()
            .map(|name| {
                let instant = self.for_prayer(&name);
                (name, instant)
            })
            .collect()
    }
}

/// Computes canonical instants for a location and date. Must be
/// deterministic for a given (latitude, longitude, date) triple.
pub trait PrayerTimeProvider {
    fn canonical_times(
        &self,
        observer: &ObserverContext,
        date: NaiveDate,
    ) -> Result<CanonicalTimes>;
}

pub struct SalahProvider {
    method_str: String,
    madhab_str: String,
}

impl SalahProvider {
    pub fn new(method: &str, madhab: &str) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        Ok(Self {
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
        })
    }
}

impl PrayerTimeProvider for SalahProvider {
    fn canonical_times(
        &self,
        observer: &ObserverContext,
        date: NaiveDate,
    ) -> Result<CanonicalTimes> {
        let coords = Coordinates::new(observer.latitude, observer.longitude);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        Ok(CanonicalTimes {
            fajr: times.time(Prayer::Fajr),
            sunrise: times.time(Prayer::Sunrise),
            dhuhr: times.time(Prayer::Dhuhr),
            asr: times.time(Prayer::Asr),
            maghrib: times.time(Prayer::Maghrib),
            isha: times.time(Prayer::Isha),
        })
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];
