use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct SubjectClassCount {
    #[schema(example = "Math")]
    pub subject: String,
    /// Distinct class dates held for this subject; 0 when no session yet
    #[schema(example = 12)]
    pub total_classes: i64,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct Defaulter {
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = 1)]
    pub roll_no: u32,
    #[schema(example = "Math")]
    pub subject: String,
    #[schema(example = 50.0)]
    pub attendance_percentage: f64,
}

#[derive(Serialize, ToSchema)]
pub struct HomeReport {
    pub subject_totals: Vec<SubjectClassCount>,
    pub defaulters: Vec<Defaulter>,
}

/// Home report: per-subject class totals plus the defaulters list
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Subject totals and defaulters", body = HomeReport),
        (status = 303, description = "Not logged in, redirected to /login"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn home(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    // LEFT JOIN so a subject with zero sessions still shows up with 0
    let subject_totals = sqlx::query_as::<_, SubjectClassCount>(
        r#"
        SELECT subjects.name AS subject,
               COUNT(DISTINCT attendance.date) AS total_classes
        FROM subjects
        LEFT JOIN attendance ON subjects.id = attendance.subject_id
        GROUP BY subjects.id, subjects.name
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch subject totals");
        ErrorInternalServerError("Database error")
    })?;

    // INNER JOIN: a (student, subject) pair with no records never appears,
    // so "never attended" is indistinguishable from "not yet tracked"
    let defaulters = sqlx::query_as::<_, Defaulter>(
        r#"
        SELECT students.name AS name,
               students.roll_no AS roll_no,
               subjects.name AS subject,
               CAST(SUM(attendance.status = 'Present') * 100.0
                    / COUNT(attendance.id) AS DOUBLE) AS attendance_percentage
        FROM students
        INNER JOIN attendance ON students.id = attendance.student_id
        INNER JOIN subjects ON subjects.id = attendance.subject_id
        GROUP BY students.id, students.name, students.roll_no, subjects.id, subjects.name
        HAVING attendance_percentage < 75
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch defaulters");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(HomeReport {
        subject_totals,
        defaulters,
    }))
}
