use crate::config::Config;
use crate::services::FfmpegLoader;
use crate::storage::on_disk::OnDiskStorage;
use actix_rt::signal::unix;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use futures_lite::FutureExt;
use resolution_engine::Session;
use site_extractors::{SoundCloudConfig, SoundCloudExtractor};
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use tracing::{error, info, warn};

mod config;
mod http;
mod impls;
mod services;
mod storage;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|error| Error::new(ErrorKind::InvalidInput, error))?;

    info!("Starting application...");

    let credential_storage = OnDiskStorage::create(config.credential_cache_directory.clone());
    let soundcloud_extractor = SoundCloudExtractor::create(
        SoundCloudConfig {
            api_base: config.soundcloud.api_base.clone(),
            site_base: config.soundcloud.site_base.clone(),
            ..SoundCloudConfig::default()
        },
        Arc::new(credential_storage),
    )
    .await
    .map_err(|error| Error::new(ErrorKind::Other, error))?;

    let mut session_builder = Session::builder()
        .extractor(Arc::new(soundcloud_extractor))
        .output_directory(config.output_directory.clone());

    match FfmpegLoader::locate(config.ffmpeg_path.as_deref()) {
        Ok(loader) => {
            info!(path = %loader.ffmpeg_path().display(), "Using ffmpeg");
            session_builder = session_builder.loader(Arc::new(loader));
        }
        Err(error) => {
            warn!(?error, "ffmpeg not found, downloads are disabled");
        }
    }

    let session = Arc::new(session_builder.build());

    let shutdown_timeout = config.shutdown_timeout;
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        move || {
            App::new()
                .app_data(Data::new(Arc::clone(&session)))
                .service(web::resource("/resolve").route(web::post().to(http::resolve_message)))
                .service(web::resource("/health").route(web::get().to(http::health_check)))
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_address)?
    .run();

    let server_handle = server.handle();

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!("Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    server_handle.stop(true).await;

    Ok(())
}
