use actix_web::web::Data;
use actix_web::{HttpResponse, Responder};
use resolution_engine::Session;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthResponse {
    version: &'static str,
    extractors: Vec<&'static str>,
    loaders: Vec<&'static str>,
}

pub(crate) async fn health_check(session: Data<Arc<Session>>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        version: crate::VERSION,
        extractors: session.extractors().names(),
        loaders: session.loaders().names(),
    })
}
