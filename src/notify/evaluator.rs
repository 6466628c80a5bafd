//! Due-dose evaluator — read-only scan for doses inside their notification
//! window.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::{dose, medicine};
use crate::db::DatabaseError;
use crate::models::Medicine;

/// A dose whose notification window contains "now" and whose record is not
/// taken. `date` is the date the window opened on.
#[derive(Debug, Clone, Serialize)]
pub struct DueDose {
    pub medicine: Medicine,
    pub date: NaiveDate,
    pub take_time: NaiveTime,
}

impl DueDose {
    pub fn key(&self) -> (i64, NaiveDate) {
        (self.medicine.id, self.date)
    }
}

/// Doses due at `now`: scheduled time within `[now - grace, now]`, window
/// still open, record not taken.
///
/// Windows opening on the previous local date are evaluated too, so a
/// window that spans midnight stays attributed to the date it opened on and
/// is never counted twice across the boundary. Ordering: take_time
/// ascending, medicine id as tiebreak.
pub fn due_now(
    conn: &Connection,
    now: NaiveDateTime,
    grace: Duration,
) -> Result<Vec<DueDose>, DatabaseError> {
    let today = now.date();
    let mut dates = vec![today];
    if let Some(yesterday) = today.pred_opt() {
        dates.insert(0, yesterday);
    }

    let mut due = Vec::new();
    for date in dates {
        for med in medicine::list_medicines_for_date(conn, date)? {
            let opens = date.and_time(med.take_time);
            let closes = opens + grace;
            if now < opens || now >= closes {
                continue;
            }
            let taken = dose::get_dose_record(conn, med.id, date)?
                .map(|r| r.taken)
                .unwrap_or(false);
            if taken {
                continue;
            }
            due.push(DueDose {
                date,
                take_time: med.take_time,
                medicine: med,
            });
        }
    }

    due.sort_by(|a, b| {
        a.take_time
            .cmp(&b.take_time)
            .then(a.medicine.id.cmp(&b.medicine.id))
    });
    Ok(due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::medicine::insert_medicine;
    use crate::db::sqlite::open_memory_database;
    use crate::models::MedicineDraft;
    use chrono::Utc;

    fn seed(conn: &Connection, name: &str, time: &str, start: &str, end: &str) -> i64 {
        insert_medicine(
            conn,
            &MedicineDraft {
                name: name.into(),
                dosage: "100mg".into(),
                take_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
                start_date: start.parse().unwrap(),
                end_date: end.parse().unwrap(),
                notes: None,
            },
        )
        .unwrap()
        .id
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn grace() -> Duration {
        Duration::minutes(5)
    }

    #[test]
    fn window_contains_now() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "Aspirin", "09:00", "2026-08-01", "2026-08-31");

        let due = due_now(&conn, at("2026-08-10 09:03"), grace()).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].date, "2026-08-10".parse().unwrap());
        assert_eq!(due[0].take_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn window_not_yet_open() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "Aspirin", "09:00", "2026-08-01", "2026-08-31");
        assert!(due_now(&conn, at("2026-08-10 08:59"), grace())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn window_already_elapsed() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "Aspirin", "09:00", "2026-08-01", "2026-08-31");
        assert!(due_now(&conn, at("2026-08-10 09:06"), grace())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn window_boundaries_half_open() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "Aspirin", "09:00", "2026-08-01", "2026-08-31");

        assert_eq!(due_now(&conn, at("2026-08-10 09:00"), grace()).unwrap().len(), 1);
        assert!(due_now(&conn, at("2026-08-10 09:05"), grace())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn taken_dose_excluded() {
        let conn = open_memory_database().unwrap();
        let id = seed(&conn, "Aspirin", "09:00", "2026-08-01", "2026-08-31");
        dose::set_taken(&conn, id, "2026-08-10".parse().unwrap(), true, Utc::now()).unwrap();

        assert!(due_now(&conn, at("2026-08-10 09:03"), grace())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn out_of_validity_range_excluded() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "Aspirin", "09:00", "2026-08-01", "2026-08-09");
        assert!(due_now(&conn, at("2026-08-10 09:03"), grace())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn midnight_spanning_window_keeps_opening_date() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "Night", "23:58", "2026-08-01", "2026-08-31");

        let due = due_now(&conn, at("2026-08-11 00:01"), grace()).unwrap();
        assert_eq!(due.len(), 1);
        // Attributed to the date the window opened on
        assert_eq!(due[0].date, "2026-08-10".parse().unwrap());
    }

    #[test]
    fn ordering_by_time_then_id() {
        let conn = open_memory_database().unwrap();
        let later = seed(&conn, "Later", "09:02", "2026-08-01", "2026-08-31");
        let tie_b = seed(&conn, "TieB", "09:00", "2026-08-01", "2026-08-31");
        let tie_a = seed(&conn, "TieA", "09:00", "2026-08-01", "2026-08-31");

        let due = due_now(&conn, at("2026-08-10 09:03"), grace()).unwrap();
        let ids: Vec<i64> = due.iter().map(|d| d.medicine.id).collect();
        assert_eq!(ids, vec![tie_b, tie_a, later]);
    }
}
