use actix_web::{error, web, HttpResponse};

use crate::api::ErrorResponse;
use crate::handlers;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::info!("Rejected malformed request body: {}", err);
        let response =
            HttpResponse::BadRequest().json(ErrorResponse::new(400, err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/books")
                .service(
                    web::resource("")
                        .route(web::get().to(handlers::get_all_books))
                        .route(web::post().to(handlers::add_book)),
                )
                .service(
                    web::resource("/{isbn}")
                        .route(web::get().to(handlers::get_book))
                        .route(web::put().to(handlers::update_book))
                        .route(web::delete().to(handlers::delete_book)),
                ),
        )
        .default_service(web::to(handlers::not_found));
}
