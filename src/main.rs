use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use log::info;
use std::io;
use std::sync::Arc;

use taskboard::config::Config;
use taskboard::provider::{GoTrueClient, IdentityProvider};
use taskboard::store::{PgStore, PostgrestStore, RecordStore};
use taskboard::AppState;

fn startup_error(error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;

    let identity: Arc<dyn IdentityProvider> = Arc::new(
        GoTrueClient::new(
            &config.supabase_url,
            config.supabase_key.clone(),
            config.provider_timeout,
        )
        .map_err(startup_error)?,
    );

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(database_url) => {
            info!("Using Postgres record store");
            Arc::new(PgStore::connect(database_url).await.map_err(startup_error)?)
        }
        None => {
            info!("Using REST record store at {}", config.supabase_url);
            Arc::new(
                PostgrestStore::new(
                    &config.supabase_url,
                    config.supabase_key.clone(),
                    config.provider_timeout,
                )
                .map_err(startup_error)?,
            )
        }
    };

    let bind = (config.server_host.clone(), config.server_port);
    info!("Starting taskboard server at {}", config.server_url());

    let state = AppState::new(config, identity, store);
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind(bind)?
    .run()
    .await
}
