use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use fieldforce_api::{config, helpers};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("fieldforce-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (config, config_path) =
        config::ApiConfig::load(args.config.as_deref()).expect("Failed to load config");
    tracing::info!("Loaded config from {}", config_path.display());

    let db = helpers::database::initialize_database(config.database.as_ref())
        .expect("Failed to initialize database");

    if let Some(bootstrap) = &config.bootstrap {
        if let Err(e) =
            helpers::database::bootstrap_admin(db.async_connection.clone(), bootstrap).await
        {
            tracing::warn!("Failed to create bootstrap admin: {}", e);
        }
    }

    let server_config = config.server();
    let attendance_config = config.attendance();
    if attendance_config.strict_geofence {
        tracing::info!("Strict geofence enabled: punch-ins outside territories are refused");
    }

    tracing::info!(
        "Starting server on {}:{}",
        server_config.host,
        server_config.port
    );

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        let cors = if let Some(cors_config) = &cors_config {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type", "X-User-Id"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type", "X-User-Id"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(attendance_config))
            .configure(fieldforce_api::configure)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
