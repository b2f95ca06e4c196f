use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, Responder};
use resolution_engine::{ResolveError, Session};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub(crate) struct ResolveRequest {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

fn error_status(error: &ResolveError) -> StatusCode {
    match error {
        ResolveError::NotUrl => StatusCode::BAD_REQUEST,
        ResolveError::UnsupportedService { .. }
        | ResolveError::UnsupportedContentKind { .. }
        | ResolveError::UnsupportedProtocol(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ResolveError::CantFetchInfo(_)
        | ResolveError::NoCredential
        | ResolveError::Downloading { .. } => StatusCode::BAD_GATEWAY,
        ResolveError::Undefined(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) async fn resolve_message(
    session: Data<Arc<Session>>,
    request: Json<ResolveRequest>,
) -> impl Responder {
    match session.resolve(&request.message).await {
        Ok(resolution) => HttpResponse::Ok().json(resolution),
        Err(error) => HttpResponse::build(error_status(&error)).json(ErrorResponse {
            error: error.kind(),
            message: error.to_string(),
        }),
    }
}
