use crate::auth::SESSION_USER_KEY;
use actix_session::SessionExt;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
};

/// Route guard for every content route: an anonymous browser is silently
/// redirected to the login view, never shown an error.
pub async fn session_guard(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let session = req.get_session();

    if let Ok(Some(_)) = session.get::<String>(SESSION_USER_KEY) {
        return next.call(req).await;
    }

    let resp = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .finish();
    Ok(req.into_response(resp.map_into_boxed_body()))
}
