use std::collections::HashSet;

use thiserror::Error;

use crate::models::{DaySchedule, PrayerRecord, PrayerStatus};

#[derive(Debug, Error, PartialEq)]
pub enum ProposeError {
    #[error("a status change for this prayer is already in flight")]
    SlotBusy,
}

/// Token for a proposed status change. Consuming it through `confirm` or
/// `reject` is the only way to resolve the proposal, so a change can never
/// be applied twice or applied and rolled back.
#[must_use]
#[derive(Debug)]
pub struct PendingChange {
    slot_id: String,
    status: PrayerStatus,
}

/// In-memory application state: the backend records for the current day,
/// the records for the current month, and the schedule derived from the
/// day records. Status changes go through propose/confirm/reject so the
/// local views mutate strictly after the backend has accepted the change.
#[derive(Debug, Default)]
pub struct ObservanceState {
    day_records: Option<Vec<PrayerRecord>>,
    month_records: Option<Vec<PrayerRecord>>,
    schedule: Option<DaySchedule>,
    in_flight: HashSet<String>,
}

impl ObservanceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_records(&self) -> Option<&[PrayerRecord]> {
        self.day_records.as_deref()
    }

    pub fn month_records(&self) -> Option<&[PrayerRecord]> {
        self.month_records.as_deref()
    }

    pub fn schedule(&self) -> Option<&DaySchedule> {
        self.schedule.as_ref()
    }

    pub fn set_day_records(&mut self, records: Vec<PrayerRecord>) {
        self.day_records = Some(records);
        self.schedule = None;
    }

    pub fn set_month_records(&mut self, records: Vec<PrayerRecord>) {
        self.month_records = Some(records);
    }

    pub fn set_schedule(&mut self, schedule: DaySchedule) {
        self.schedule = Some(schedule);
    }

    /// Drop the day's records and derived schedule after day-rollover
    /// detection. In-flight proposals stay registered; their confirmations
    /// land as no-ops once the records are gone.
    pub fn invalidate_day(&mut self) {
        self.day_records = None;
        self.schedule = None;
    }

    /// Register a status change for a slot. At most one change per slot may
    /// be in flight; a second propose is refused until the first resolves.
    pub fn propose(
        &mut self,
        slot_id: &str,
        status: PrayerStatus,
    ) -> Result<PendingChange, ProposeError> {
        if !self.in_flight.insert(slot_id.to_string()) {
            return Err(ProposeError::SlotBusy);
        }
        Ok(PendingChange {
            slot_id: slot_id.to_string(),
            status,
        })
    }

    /// Apply a confirmed change to every view that still holds the slot.
    /// Views that no longer contain it (cleared by rollover, or never
    /// loaded) are skipped rather than treated as errors.
    pub fn confirm(&mut self, change: PendingChange) {
        self.in_flight.remove(&change.slot_id);

        if let Some(records) = self.day_records.as_mut() {
            if let Some(record) = records.iter_mut().find(|r| r.id == change.slot_id) {
                record.status = change.status.clone();
            }
        }
        if let Some(records) = self.month_records.as_mut() {
            if let Some(record) = records.iter_mut().find(|r| r.id == change.slot_id) {
                record.status = change.status.clone();
            }
        }
        if let Some(schedule) = self.schedule.as_mut() {
            if let Some(slot) = schedule.slots.iter_mut().find(|s| s.id == change.slot_id) {
                slot.status = change.status;
            }
        }
    }

    /// Discard a rejected change. All views keep their pre-propose values.
    pub fn reject(&mut self, change: PendingChange) {
        self.in_flight.remove(&change.slot_id);
    }
}
