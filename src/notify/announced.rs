use std::collections::HashSet;

use chrono::NaiveDate;

/// Per-day memory of doses already announced, preventing repeat alarms for
/// the same due dose across polling cycles.
///
/// Keys carry the date the notification window opened on. Rollover retains
/// the previous local day so a window spanning midnight is not re-announced,
/// and drops everything older.
#[derive(Debug, Default)]
pub struct AnnouncedSet {
    keys: HashSet<(i64, NaiveDate)>,
}

impl AnnouncedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, medicine_id: i64, date: NaiveDate) -> bool {
        self.keys.contains(&(medicine_id, date))
    }

    pub fn insert(&mut self, medicine_id: i64, date: NaiveDate) {
        self.keys.insert((medicine_id, date));
    }

    /// Remove one key, re-arming the dose for announcement. Called when a
    /// dose is untaken; a no-op if the key was never announced.
    pub fn retract(&mut self, medicine_id: i64, date: NaiveDate) {
        self.keys.remove(&(medicine_id, date));
    }

    /// Drop entries older than the previous local day.
    pub fn rollover(&mut self, today: NaiveDate) {
        let horizon = today.pred_opt().unwrap_or(today);
        self.keys.retain(|(_, date)| *date >= horizon);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
