mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::{env_config::Config, http};
use mailer::Dispatcher;
use storage::FileStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup(is_production).expect("Failed to set up logger");
    }

    // init store
    let store = db::open(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    if config.seed_default_user {
        api_auth::services::user::seed_default_user(store.as_ref(), config.bcrypt_cost)
            .await
            .expect("Failed to seed default user");
    }

    // init file storage and email dispatch
    let storage = Arc::new(
        FileStorage::new(&config.storage_config.upload_dir)
            .await
            .expect("Failed to create upload directory"),
    );
    let upload_dir = storage.root().to_path_buf();
    let dispatcher = Arc::new(
        Dispatcher::new(
            &config.email_config,
            storage.clone(),
            &config.storage_config.app_base_url,
        )
        .expect("Failed to create email dispatcher"),
    );

    log::info!(
        "Starting server on {}:{} ({})",
        config.server_host,
        config.server_port,
        config.environment
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(dispatcher.clone()))
            .app_data(http::json_config())
            .app_data(http::path_config())
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(actix_files::Files::new("/uploads", upload_dir.clone()))
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth())
                    .service(api_files::mount_files())
                    .service(api_invoices::mount_invoices().wrap(api_auth::auth_middleware())),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
