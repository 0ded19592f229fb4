use crate::routes::see_other;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct NewSubject {
    #[schema(example = "Math")]
    pub subject_name: String,
}

/// Add-subject form view
#[utoipa::path(
    get,
    path = "/add_subject",
    responses(
        (status = 200, description = "Add-subject form"),
        (status = 303, description = "Not logged in, redirected to /login")
    ),
    tag = "Subjects"
)]
pub async fn add_subject_form() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Create Subject
#[utoipa::path(
    post,
    path = "/add_subject",
    request_body(content = NewSubject, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Subject created, redirected home"),
        (status = 409, description = "Duplicate subject name", body = Object, example = json!({
            "error": "Subject already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Subjects"
)]
pub async fn add_subject(
    form: web::Form<NewSubject>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let result = sqlx::query("INSERT INTO subjects (name) VALUES (?)")
        .bind(&form.subject_name)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => Ok(see_other("/")),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Subject already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create subject");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}
