use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{AppointmentRecord, AppointmentSnapshot, DEFAULT_DEPARTMENT};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Appointments ──

pub fn insert_appointment(
    conn: &Connection,
    snapshot: &AppointmentSnapshot,
) -> anyhow::Result<AppointmentRecord> {
    let record = AppointmentRecord {
        id: uuid::Uuid::new_v4().to_string(),
        patient_name: snapshot.patient_name.clone(),
        contact_number: snapshot.contact_number.clone(),
        preferred_date: snapshot.preferred_date.clone(),
        preferred_time: snapshot.preferred_time.clone(),
        department: snapshot
            .department
            .clone()
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
        symptoms: snapshot.symptoms.clone(),
        severity: snapshot
            .severity
            .clone()
            .unwrap_or_else(|| "mild".to_string()),
        status: "confirmed".to_string(),
        booking_timestamp: Utc::now().naive_utc(),
        conversation_summary: snapshot.summary(),
    };

    let symptoms_json = serde_json::to_string(&record.symptoms)?;
    let booked_at = record.booking_timestamp.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO appointments (id, patient_name, contact_number, preferred_date, preferred_time, department, symptoms, severity, status, booking_timestamp, conversation_summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.id,
            record.patient_name,
            record.contact_number,
            record.preferred_date,
            record.preferred_time,
            record.department,
            symptoms_json,
            record.severity,
            record.status,
            booked_at,
            record.conversation_summary,
        ],
    )?;
    Ok(record)
}

pub fn get_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<AppointmentRecord>> {
    let result = conn.query_row(
        "SELECT id, patient_name, contact_number, preferred_date, preferred_time, department, symptoms, severity, status, booking_timestamp, conversation_summary \
         FROM appointments WHERE id = ?1",
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(record) => Ok(Some(record?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_recent_appointments(
    conn: &Connection,
    limit: i64,
) -> anyhow::Result<Vec<AppointmentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, contact_number, preferred_date, preferred_time, department, symptoms, severity, status, booking_timestamp, conversation_summary \
         FROM appointments ORDER BY booking_timestamp DESC, rowid DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| Ok(parse_appointment_row(row)))?;

    let mut records = vec![];
    for row in rows {
        records.push(row??);
    }
    Ok(records)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<AppointmentRecord> {
    let symptoms_json: String = row.get(6)?;
    let booked_at: String = row.get(9)?;

    let booking_timestamp = NaiveDateTime::parse_from_str(&booked_at, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(AppointmentRecord {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        contact_number: row.get(2)?,
        preferred_date: row.get(3)?,
        preferred_time: row.get(4)?,
        department: row.get(5)?,
        symptoms: serde_json::from_str(&symptoms_json).unwrap_or_default(),
        severity: row.get(7)?,
        status: row.get(8)?,
        booking_timestamp,
        conversation_summary: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn snapshot(name: &str) -> AppointmentSnapshot {
        AppointmentSnapshot {
            patient_name: name.to_string(),
            contact_number: "555-0100".to_string(),
            preferred_date: "2025-06-16".to_string(),
            preferred_time: "10:00".to_string(),
            department: None,
            symptoms: vec!["back pain".to_string()],
            severity: None,
        }
    }

    #[test]
    fn test_insert_and_get_appointment() {
        let conn = setup_db();
        let saved = insert_appointment(&conn, &snapshot("Alice")).unwrap();

        let loaded = get_appointment(&conn, &saved.id).unwrap().unwrap();
        assert_eq!(loaded.patient_name, "Alice");
        assert_eq!(loaded.department, DEFAULT_DEPARTMENT);
        assert_eq!(loaded.severity, "mild");
        assert_eq!(loaded.status, "confirmed");
        assert_eq!(loaded.symptoms, vec!["back pain"]);
        assert!(loaded.conversation_summary.contains("back pain"));
    }

    #[test]
    fn test_get_missing_appointment() {
        let conn = setup_db();
        assert!(get_appointment(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_list_recent_newest_first() {
        let conn = setup_db();
        insert_appointment(&conn, &snapshot("First")).unwrap();
        insert_appointment(&conn, &snapshot("Second")).unwrap();
        insert_appointment(&conn, &snapshot("Third")).unwrap();

        let recent = list_recent_appointments(&conn, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].patient_name, "Third");
        assert_eq!(recent[1].patient_name, "Second");
    }
}
