pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use infrastructure::FileExportSink;

/// Register the `/orders` and `/health` routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::orders::health))
        .service(
            web::scope("/orders")
                .route("/preview", web::post().to(handlers::orders::preview_order))
                .route("/export", web::post().to(handlers::orders::export_order))
                .route("/validate", web::post().to(handlers::orders::validate_order))
                .route("/confirm", web::post().to(handlers::orders::confirm_order)),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    sink: FileExportSink,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let sink = web::Data::new(sink);
    let openapi = handlers::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(sink.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
