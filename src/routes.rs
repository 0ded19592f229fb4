use crate::{
    api::{attendance, report, student, subject},
    auth::{handlers, middleware::session_guard},
};
use actix_web::{HttpResponse, http::header, middleware::from_fn, web};

/// Navigation between views keeps the classic post/redirect/get flow.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Public routes
    cfg.service(
        web::resource("/login")
            .route(web::get().to(handlers::login_page))
            .route(web::post().to(handlers::login)),
    );
    cfg.service(
        web::resource("/logout")
            .route(web::get().to(handlers::logout))
            .route(web::post().to(handlers::logout)),
    );

    // Content routes, all behind the session guard
    cfg.service(
        web::scope("")
            .wrap(from_fn(session_guard))
            .service(web::resource("/").route(web::get().to(report::home)))
            .service(
                web::resource("/add_student")
                    .route(web::get().to(student::add_student_form))
                    .route(web::post().to(student::add_student)),
            )
            .service(
                web::resource("/add_subject")
                    .route(web::get().to(subject::add_subject_form))
                    .route(web::post().to(subject::add_subject)),
            )
            .service(
                web::resource("/mark_attendance")
                    .route(web::get().to(attendance::mark_attendance_form))
                    .route(web::post().to(attendance::mark_attendance)),
            )
            .service(
                web::resource("/students_list").route(web::get().to(student::students_list)),
            ),
    );
}
