use crate::{model::student::Student, model::subject::Subject, routes::see_other};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct NewStudent {
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = 1)]
    pub roll_no: u32,
}

#[derive(Serialize, ToSchema)]
pub struct SubjectAttendance {
    #[schema(example = "Math")]
    pub subject: String,
    #[schema(example = 1)]
    pub present_attendance: i64,
    #[schema(example = 2)]
    pub total_attendance: i64,
}

#[derive(Serialize, ToSchema)]
pub struct StudentAttendanceRow {
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = 1)]
    pub roll_no: u32,
    #[schema(example = 50.0)]
    pub attendance_percentage: f64,
    pub attendance: Vec<SubjectAttendance>,
}

#[derive(Serialize, ToSchema)]
pub struct StudentsListResponse {
    pub subjects: Vec<Subject>,
    pub students: Vec<StudentAttendanceRow>,
}

#[derive(sqlx::FromRow)]
struct PairCount {
    student_id: u64,
    subject_id: u64,
    present: i64,
    total: i64,
}

/// Add-student form view
#[utoipa::path(
    get,
    path = "/add_student",
    responses(
        (status = 200, description = "Add-student form"),
        (status = 303, description = "Not logged in, redirected to /login")
    ),
    tag = "Students"
)]
pub async fn add_student_form() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Create Student
#[utoipa::path(
    post,
    path = "/add_student",
    request_body(content = NewStudent, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Student created, redirected to /students_list"),
        (status = 409, description = "Duplicate roll number", body = Object, example = json!({
            "error": "Roll number already registered"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn add_student(
    form: web::Form<NewStudent>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let result = sqlx::query("INSERT INTO students (name, roll_no) VALUES (?, ?)")
        .bind(&form.name)
        .bind(form.roll_no)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => Ok(see_other("/students_list")),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Roll number already registered"
                    })));
                }
            }

            error!(error = %e, "Failed to create student");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}

/// Per-student per-subject attendance report
#[utoipa::path(
    get,
    path = "/students_list",
    responses(
        (status = 200, description = "Nested attendance report", body = StudentsListResponse),
        (status = 303, description = "Not logged in, redirected to /login"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn students_list(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
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

    let counts = sqlx::query_as::<_, PairCount>(
        r#"
        SELECT student_id, subject_id,
               CAST(SUM(status = 'Present') AS SIGNED) AS present,
               COUNT(*) AS total
        FROM attendance
        GROUP BY student_id, subject_id
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch attendance counts");
        ErrorInternalServerError("Database error")
    })?;

    let students = build_rows(students, &subjects, &counts);

    Ok(HttpResponse::Ok().json(StudentsListResponse { subjects, students }))
}

/// Expands the grouped counts into one row per student covering every
/// subject; pairs with no records show as 0 present of 0 total.
fn build_rows(
    students: Vec<Student>,
    subjects: &[Subject],
    counts: &[PairCount],
) -> Vec<StudentAttendanceRow> {
    let by_pair: HashMap<(u64, u64), &PairCount> = counts
        .iter()
        .map(|c| ((c.student_id, c.subject_id), c))
        .collect();

    students
        .into_iter()
        .map(|student| {
            let attendance = subjects
                .iter()
                .map(|subject| {
                    let (present, total) = by_pair
                        .get(&(student.id, subject.id))
                        .map(|c| (c.present, c.total))
                        .unwrap_or((0, 0));

                    SubjectAttendance {
                        subject: subject.name.clone(),
                        present_attendance: present,
                        total_attendance: total,
                    }
                })
                .collect();

            StudentAttendanceRow {
                name: student.name,
                roll_no: student.roll_no,
                attendance_percentage: student.attendance_percentage,
                attendance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: u64, name: &str, roll_no: u32) -> Student {
        Student {
            id,
            name: name.into(),
            roll_no,
            attendance_percentage: 0.0,
        }
    }

    fn subject(id: u64, name: &str) -> Subject {
        Subject {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn every_subject_appears_for_every_student() {
        let students = vec![student(1, "Asha", 1), student(2, "Ravi", 2)];
        let subjects = vec![subject(10, "Math"), subject(11, "Physics")];

        let rows = build_rows(students, &subjects, &[]);

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.attendance.len(), 2);
            for cell in &row.attendance {
                assert_eq!(cell.present_attendance, 0);
                assert_eq!(cell.total_attendance, 0);
            }
        }
    }

    #[test]
    fn counts_land_on_the_matching_pair_only() {
        let students = vec![student(1, "Asha", 1), student(2, "Ravi", 2)];
        let subjects = vec![subject(10, "Math"), subject(11, "Physics")];
        let counts = vec![PairCount {
            student_id: 1,
            subject_id: 11,
            present: 3,
            total: 4,
        }];

        let rows = build_rows(students, &subjects, &counts);

        assert_eq!(rows[0].attendance[1].present_attendance, 3);
        assert_eq!(rows[0].attendance[1].total_attendance, 4);

        assert_eq!(rows[0].attendance[0].total_attendance, 0);
        assert_eq!(rows[1].attendance[1].total_attendance, 0);
    }

    #[test]
    fn subject_order_matches_header_order() {
        let students = vec![student(1, "Asha", 1)];
        let subjects = vec![subject(11, "Physics"), subject(10, "Math")];

        let rows = build_rows(students, &subjects, &[]);

        let names: Vec<_> = rows[0].attendance.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(names, ["Physics", "Math"]);
    }
}
