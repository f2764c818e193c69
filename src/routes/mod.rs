pub mod auth;
pub mod boards;
pub mod health;
pub mod tasks;

use actix_web::web;
use log::warn;

use crate::auth::RequireAuth;
use crate::error::AppError;

/// Registers every route of the API.
///
/// Expects `web::Data` for `AccountOnboarding`, `Config`, `dyn RecordStore` and
/// `dyn SessionLookup` to be registered on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(boards::list_user_boards)
        .service(
            web::scope("/api")
                .service(auth::login)
                .service(auth::signup)
                .service(auth::logout)
                .service(
                    web::scope("/tasks")
                        .wrap(RequireAuth)
                        .service(tasks::create_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                ),
        );
}

/// Path segments that fail to parse are reported like the store's own filter errors.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        warn!("rejected path {}: {}", req.path(), err);
        AppError::DatabaseError(err.to_string()).into()
    })
}

/// Malformed or mistyped JSON bodies are answered with `{"error": ...}` like every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
