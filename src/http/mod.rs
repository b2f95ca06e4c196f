mod health;
mod resolve;

pub(crate) use health::health_check;
pub(crate) use resolve::resolve_message;

#[cfg(test)]
mod tests {
    use super::{health_check, resolve_message};
    use actix_web::http::StatusCode;
    use actix_web::web::{self, Data};
    use actix_web::{test, App};
    use async_trait::async_trait;
    use resolution_engine::{ContentKind, ExtractionError, Extractor, Session, TrackMetadata};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use url::Url;

    struct PlaylistOnlyExtractor;

    #[async_trait]
    impl Extractor for PlaylistOnlyExtractor {
        fn name(&self) -> &'static str {
            "playlist-only"
        }

        fn compatible(&self, url: &Url) -> bool {
            url.host_str() == Some("soundcloud.com")
        }

        async fn extract(&self, _url: &Url) -> Result<TrackMetadata, ExtractionError> {
            Err(ExtractionError::UnsupportedContentKind(ContentKind::Playlist))
        }
    }

    fn session() -> Data<Arc<Session>> {
        Data::new(Arc::new(
            Session::builder()
                .extractor(Arc::new(PlaylistOnlyExtractor))
                .build(),
        ))
    }

    #[actix_rt::test]
    async fn should_map_errors_to_statuses() {
        let app = test::init_service(
            App::new()
                .app_data(session())
                .service(web::resource("/resolve").route(web::post().to(resolve_message))),
        )
        .await;

        let cases = [
            ("no links here", StatusCode::BAD_REQUEST, "not_url"),
            (
                "https://youtube.com/watch?v=1",
                StatusCode::UNPROCESSABLE_ENTITY,
                "unsupported_service",
            ),
            (
                "https://soundcloud.com/user/sets/album",
                StatusCode::UNPROCESSABLE_ENTITY,
                "unsupported_content_kind",
            ),
        ];

        for (message, status, kind) in cases {
            let request = test::TestRequest::post()
                .uri("/resolve")
                .set_json(json!({ "message": message }))
                .to_request();

            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), status, "{}", message);

            let body: Value = test::read_body_json(response).await;
            assert_eq!(body["error"], kind);
            assert!(body["message"].is_string());
        }
    }

    #[actix_rt::test]
    async fn should_list_registered_plugins() {
        let app = test::init_service(
            App::new()
                .app_data(session())
                .service(web::resource("/health").route(web::get().to(health_check))),
        )
        .await;

        let request = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body["extractors"], json!(["playlist-only"]));
        assert_eq!(body["loaders"], json!([]));
        assert_eq!(body["version"], crate::VERSION);
    }
}
