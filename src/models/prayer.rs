use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// The five daily prayers in canonical order.
    pub fn all() -> Vec<PrayerName> {
        vec![
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" | "subuh" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "zuhur" => Ok(PrayerName::Dhuhr),
            "asr" | "asar" => Ok(PrayerName::Asr),
            "maghrib" | "magrib" => Ok(PrayerName::Maghrib),
            "isha" | "isya" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrayerStatus {
    Pending,
    OnTime,
    Late,
    Missed,
}

impl PrayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerStatus::Pending => "pending",
            PrayerStatus::OnTime => "on_time",
            PrayerStatus::Late => "late",
            PrayerStatus::Missed => "missed",
        }
    }
}

impl FromStr for PrayerStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PrayerStatus::Pending),
            "on_time" => Ok(PrayerStatus::OnTime),
            "late" => Ok(PrayerStatus::Late),
            "missed" => Ok(PrayerStatus::Missed),
            _ => Err(anyhow::anyhow!("Unknown prayer status: {}", s)),
        }
    }
}

/// A prayer record as the observance backend stores it. `day` is the
/// day-of-month the record was created for, used to detect day rollover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRecord {
    pub id: String,
    pub name: PrayerName,
    pub status: PrayerStatus,
    pub day: u32,
}

/// One slot of a day's schedule. The id is either the backend's record id
/// or, when no record exists yet, a deterministic fallback derived from the
/// canonical instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerSlot {
    pub id: String,
    pub name: PrayerName,
    pub instant: DateTime<Utc>,
    pub status: PrayerStatus,
}

impl PrayerSlot {
    pub fn fallback_id(instant: DateTime<Utc>) -> String {
        instant.to_rfc3339()
    }
}

/// The ordered schedule for one calendar day. `day` is derived from the
/// fajr instant in the observer's timezone. `slots` is either empty (the
/// backend holds no records for the day yet) or the five prayers in
/// canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub day: NaiveDate,
    pub slots: Vec<PrayerSlot>,
}

impl DaySchedule {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_index(&self, name: &PrayerName) -> Option<usize> {
        self.slots.iter().position(|slot| &slot.name == name)
    }
}
