use dotenvy::dotenv;
use procurement_order::{build_server, AppConfig, FileExportSink};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!(
        "Starting server at http://{}:{} (exports in {})",
        config.host,
        config.port,
        config.export_dir.display()
    );

    build_server(
        FileExportSink::new(config.export_dir),
        &config.host,
        config.port,
    )?
    .await
}
