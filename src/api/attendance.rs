use crate::{model::student::Student, model::subject::Subject, routes::see_other};
use actix_session::Session;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

const FLASH_KEY: &str = "flash";

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = 1)]
    pub student_id: u64,
    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceReq {
    #[schema(example = 1)]
    pub subject_id: u64,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct MarkAttendanceView {
    pub students: Vec<Student>,
    pub subjects: Vec<Subject>,
    /// One-shot message left by a rejected submission, cleared on read
    #[schema(example = "Attendance for the selected date and subject already exists")]
    pub flash: Option<String>,
}

/// Mark-attendance form view: selection data plus any pending flash message
#[utoipa::path(
    get,
    path = "/mark_attendance",
    responses(
        (status = 200, description = "Students, subjects and pending flash", body = MarkAttendanceView),
        (status = 303, description = "Not logged in, redirected to /login"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance_form(
    session: Session,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, roll_no,
               CAST(attendance_percentage AS DOUBLE) AS attendance_percentage
        FROM students
        ORDER BY roll_no
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch students");
        ErrorInternalServerError("Database error")
    })?;

    let subjects = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch subjects");
            ErrorInternalServerError("Database error")
        })?;

    let flash = session.remove_as::<String>(FLASH_KEY).and_then(Result::ok);

    Ok(HttpResponse::Ok().json(MarkAttendanceView {
        students,
        subjects,
        flash,
    }))
}

/// Record attendance for one subject and date
#[utoipa::path(
    post,
    path = "/mark_attendance",
    request_body = MarkAttendanceReq,
    responses(
        (status = 303, description = "Recorded (redirect to /students_list) or already-recorded date/subject (flash set, redirect back to /mark_attendance)"),
        (status = 409, description = "Duplicate row for (student, subject, date)", body = Object, example = json!({
            "error": "Attendance already recorded for this student, subject and date"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    payload: web::Json<MarkAttendanceReq>,
    session: Session,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    // Pre-check and batch insert share one transaction. The unique key on
    // (student_id, subject_id, date) is the hard guarantee: a resubmission
    // that overlaps an existing row hits it even when it races the
    // non-locking pre-check. Concurrent submissions with disjoint student
    // sets for the same date and subject can still both commit.
    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Database error")
    })?;

    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE date = ? AND subject_id = ?")
            .bind(payload.date)
            .bind(payload.subject_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check existing attendance");
                ErrorInternalServerError("Database error")
            })?;

    if existing > 0 {
        info!(
            subject_id = payload.subject_id,
            date = %payload.date,
            "Attendance already recorded for this date and subject"
        );
        session
            .insert(
                FLASH_KEY,
                "Attendance for the selected date and subject already exists",
            )
            .map_err(ErrorInternalServerError)?;
        return Ok(see_other("/mark_attendance"));
    }

    for entry in &payload.entries {
        let result = sqlx::query(
            "INSERT INTO attendance (student_id, subject_id, date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(entry.student_id)
        .bind(payload.subject_id)
        .bind(payload.date)
        .bind(&entry.status)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            // Transaction rolls back on drop, nothing is half-written
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Attendance already recorded for this student, subject and date"
                    })));
                }
            }

            error!(error = %e, student_id = entry.student_id, "Failed to record attendance");
            return Err(ErrorInternalServerError("Database error"));
        }
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit attendance");
        ErrorInternalServerError("Database error")
    })?;

    info!(
        subject_id = payload.subject_id,
        date = %payload.date,
        rows = payload.entries.len(),
        "Attendance recorded"
    );

    Ok(see_other("/students_list"))
}
