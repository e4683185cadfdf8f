use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;

use listify::auth::{AuthMiddleware, PasswordHasher, SessionIssuer};
use listify::config::Config;
use listify::routes::{self, health};
use listify::store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use listify::AppState;

async fn open_store(config: &Config) -> io::Result<Arc<dyn CredentialStore>> {
    let Some(database_url) = &config.database_url else {
        log::warn!("DATABASE_URL is not set; accounts are kept in memory and lost on exit");
        return Ok(Arc::new(MemoryCredentialStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("database connection failed: {}", e)))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migrations failed: {}", e)))?;
    log::info!("database migrations applied");

    Ok(Arc::new(PgCredentialStore::new(pool)))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = open_store(&config).await?;

    let state = web::Data::new(AppState::new(
        store,
        PasswordHasher::new(config.bcrypt_cost),
        SessionIssuer::new(&config.jwt_secret, Duration::hours(config.session_ttl_hours)),
    ));

    log::info!("Starting Listify server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
