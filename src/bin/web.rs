//! Single binary web server: JSON REST API over the squash tracker, backed by SQLite.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST, PORT, DATABASE_PATH (see `Config`).

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use squash_tracker::{api, db, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    log::info!(
        "Using database {} (K={}, {} matches per session)",
        config.database_path,
        config.rules.k_factor,
        config.rules.matches_per_session
    );

    let state = db::create_pool(&config.database_path)
        .and_then(|pool| api::AppState::open(pool, &config))
        .map_err(|e| {
            log::error!("Failed to open tracker store: {:#}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
    let state = Data::new(state);

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
