//! Notification dispatcher — one evaluation step per polling cycle.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::core_state::{CoreError, CoreState};
use crate::db::DatabaseError;
use crate::notify::evaluator::{due_now, DueDose};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Output of one dispatch cycle, handed to the presentation layer.
///
/// `should_play_sound` is true exactly when `items` is non-empty; an empty
/// batch is the no-op signal telling the collaborator to stay silent.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationBatch {
    pub should_play_sound: bool,
    pub items: Vec<DueDose>,
}

impl NotificationBatch {
    fn silent() -> Self {
        Self {
            should_play_sound: false,
            items: Vec::new(),
        }
    }
}

/// Run one dispatch cycle at `now`.
///
/// Evaluates due doses, drops those already announced, marks the remainder
/// announced, and returns the batch. A given (medicine, date) is announced
/// at most once regardless of poll frequency; untaking the dose while its
/// window is open retracts the entry and re-arms it.
pub fn dispatch(state: &CoreState, now: NaiveDateTime) -> Result<NotificationBatch, DispatchError> {
    let conn = state.open_db()?;
    let due = due_now(&conn, now, config::grace())?;

    let mut announced = state.announced()?;
    announced.rollover(now.date());

    let fresh: Vec<DueDose> = due
        .into_iter()
        .filter(|d| {
            let (id, date) = d.key();
            !announced.contains(id, date)
        })
        .collect();

    if fresh.is_empty() {
        return Ok(NotificationBatch::silent());
    }

    for d in &fresh {
        let (id, date) = d.key();
        announced.insert(id, date);
    }

    Ok(NotificationBatch {
        should_play_sound: true,
        items: fresh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::repository::medicine::insert_medicine;
    use crate::doses;
    use crate::models::MedicineDraft;
    use chrono::{NaiveDate, NaiveTime};

    fn state_with(meds: &[(&str, &str)]) -> (tempfile::TempDir, CoreState, Vec<i64>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dosewatch.db");
        let conn = db::open_database(&path).unwrap();
        let ids = meds
            .iter()
            .map(|(name, time)| {
                insert_medicine(
                    &conn,
                    &MedicineDraft {
                        name: (*name).into(),
                        dosage: "100mg".into(),
                        take_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
                        start_date: "2026-08-01".parse().unwrap(),
                        end_date: "2026-08-31".parse().unwrap(),
                        notes: None,
                    },
                )
                .unwrap()
                .id
            })
            .collect();
        (dir, CoreState::new(path), ids)
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn announces_once_per_open_window() {
        let (_dir, state, _) = state_with(&[("Aspirin", "09:00")]);

        let first = dispatch(&state, at("2026-08-10 09:01")).unwrap();
        assert!(first.should_play_sound);
        assert_eq!(first.items.len(), 1);

        // Same window, next poll — suppressed
        let second = dispatch(&state, at("2026-08-10 09:03")).unwrap();
        assert!(!second.should_play_sound);
        assert!(second.items.is_empty());
    }

    #[test]
    fn empty_cycle_is_silent() {
        let (_dir, state, _) = state_with(&[("Aspirin", "09:00")]);
        let batch = dispatch(&state, at("2026-08-10 12:00")).unwrap();
        assert!(!batch.should_play_sound);
        assert!(batch.items.is_empty());
    }

    #[test]
    fn untake_within_window_rearms() {
        let (_dir, state, ids) = state_with(&[("Aspirin", "09:00")]);
        let day: NaiveDate = "2026-08-10".parse().unwrap();

        assert!(dispatch(&state, at("2026-08-10 09:01")).unwrap().should_play_sound);

        doses::toggle(&state, ids[0], day).unwrap(); // taken
        doses::toggle(&state, ids[0], day).unwrap(); // untaken — retracts

        let again = dispatch(&state, at("2026-08-10 09:03")).unwrap();
        assert!(again.should_play_sound, "untaken dose re-announces in open window");
    }

    #[test]
    fn taken_dose_never_announced() {
        let (_dir, state, ids) = state_with(&[("Aspirin", "08:00")]);
        let day: NaiveDate = "2026-08-10".parse().unwrap();

        doses::toggle(&state, ids[0], day).unwrap();

        let batch = dispatch(&state, at("2026-08-10 08:02")).unwrap();
        assert!(!batch.should_play_sound);
    }

    #[test]
    fn day_rollover_does_not_suppress_next_day() {
        let (_dir, state, _) = state_with(&[("Aspirin", "09:00")]);

        assert!(dispatch(&state, at("2026-08-10 09:01")).unwrap().should_play_sound);
        // Next day, same medicine, fresh window
        assert!(dispatch(&state, at("2026-08-11 09:01")).unwrap().should_play_sound);
    }

    #[test]
    fn stale_entries_dropped_on_rollover() {
        let (_dir, state, ids) = state_with(&[("Aspirin", "09:00")]);
        state
            .announced()
            .unwrap()
            .insert(ids[0], "2026-08-01".parse().unwrap());

        dispatch(&state, at("2026-08-10 12:00")).unwrap();
        assert!(state.announced().unwrap().is_empty());
    }

    #[test]
    fn end_to_end_taken_dose_leaves_due_list() {
        let (_dir, state, ids) = state_with(&[("Aspirin", "08:00")]);
        let day: NaiveDate = "2026-08-10".parse().unwrap();

        let batch = dispatch(&state, at("2026-08-10 08:02")).unwrap();
        assert!(batch.should_play_sound);
        assert_eq!(batch.items[0].medicine.id, ids[0]);
        assert_eq!(batch.items[0].date, day);
        assert_eq!(
            batch.items[0].take_time,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );

        let taken = doses::toggle(&state, ids[0], day).unwrap();
        assert!(taken.is_taken);

        let conn = state.open_db().unwrap();
        assert!(due_now(&conn, at("2026-08-10 08:04"), config::grace())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn batch_lists_multiple_due_in_schedule_order() {
        let (_dir, state, ids) = state_with(&[("Second", "09:01"), ("First", "09:00")]);

        let batch = dispatch(&state, at("2026-08-10 09:02")).unwrap();
        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.items[0].medicine.id, ids[1]);
        assert_eq!(batch.items[1].medicine.id, ids[0]);
    }
}
