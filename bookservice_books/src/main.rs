use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use bookservice_books::app_config::config_app;
use bookservice_books::books_repository::{
    BookRepository, InMemoryBooksRepository, PostgresBooksRepository,
};
use bookservice_books::settings::Settings;
use bookservice_books::telemetry::{init_telemetry, shutdown_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_telemetry(&settings.telemetry)?;

    let books_repository: Arc<dyn BookRepository> = if settings.use_in_memory_db {
        tracing::info!("Using in memory books repository");
        Arc::new(InMemoryBooksRepository::default())
    } else {
        Arc::new(
            PostgresBooksRepository::init(settings.postgres_config())
                .await
                .context("Failed to init postgres")?,
        )
    };

    tracing::info!(
        "starting HTTP server at http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(books_repository.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
    })
    .bind((settings.server.host.as_str(), settings.server.port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server failed")?;

    shutdown_telemetry(&settings.telemetry);
    Ok(())
}
