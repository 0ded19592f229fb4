use crate::{
    auth::{SESSION_USER_KEY, password::verify_password},
    config::Config,
    models::LoginForm,
    routes::see_other,
};
use actix_session::Session;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{error, info, instrument};

fn is_logged_in(session: &Session) -> bool {
    matches!(session.get::<String>(SESSION_USER_KEY), Ok(Some(_)))
}

/// Login view
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form for an anonymous browser"),
        (status = 303, description = "Already authenticated, redirected home")
    ),
    tag = "Auth"
)]
pub async fn login_page(session: Session) -> impl Responder {
    if is_logged_in(&session) {
        return see_other("/");
    }

    HttpResponse::Ok().finish()
}

/// Credential check
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Credentials accepted, session set, redirected home"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid username or password"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(form, session, config), fields(username = %form.username))]
pub async fn login(
    form: web::Form<LoginForm>,
    session: Session,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    if is_logged_in(&session) {
        return Ok(see_other("/"));
    }

    let credentials_ok = form.username == config.admin_username
        && verify_password(&form.password, &config.admin_password_hash).is_ok();

    if !credentials_ok {
        info!("Invalid credentials");
        // Inline error for the login view to re-render, no redirect
        return Ok(HttpResponse::Unauthorized().json(json!({
            "error": "Invalid username or password"
        })));
    }

    session
        .insert(SESSION_USER_KEY, &form.username)
        .map_err(|e| {
            error!(error = %e, "Failed to store session");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    info!("Login successful");

    Ok(see_other("/"))
}

/// Logout: unconditionally drop the session
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared, redirected to login")
    ),
    tag = "Auth"
)]
pub async fn logout(session: Session) -> impl Responder {
    session.purge();
    see_other("/login")
}
