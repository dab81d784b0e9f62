// main.rs
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;

use destinations_api::{
    auth::JwtSettings,
    config::{AppConfig, StoreBackend},
    controllers, db,
    state::AppState,
    store::{MemoryStore, MySqlStore, Store},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::MySql => {
            let pool = match db::establish_connection(&config).await {
                Ok(pool) => pool,
                Err(e) => {
                    log::error!("Failed to initialize database pool: {:?}", e);
                    std::process::exit(1);
                }
            };
            if config.run_migrations {
                if let Err(e) = db::run_migrations(&pool).await {
                    log::error!("Migration failed: {}", e);
                    std::process::exit(1);
                }
            }
            Arc::new(MySqlStore::new(pool))
        }
        StoreBackend::Memory => {
            log::warn!("using in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let state = web::Data::new(AppState::new(store, JwtSettings::from(&config)));
    let cors_origin = config.cors_origin.clone();

    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(controllers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
