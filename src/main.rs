use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use catalog_api::auth::{GoogleVerifier, JwtKeys, PasswordHasher};
use catalog_api::db::{establish_connection_pool, run_migrations};
use catalog_api::models::config::ServerConfig;
use catalog_api::repository::DieselRepository;
use catalog_api::routes;
use catalog_api::storage::Storage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = run_migrations(&mut conn) {
                log::error!("Failed to run migrations: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get a database connection: {e}");
            std::process::exit(1);
        }
    }

    let repo = web::Data::new(DieselRepository::new(pool));
    let keys = web::Data::new(JwtKeys::new(
        &server_config.jwt_secret,
        server_config.jwt_ttl_hours,
    ));
    let hasher = web::Data::new(PasswordHasher::new(server_config.bcrypt_cost));
    let verifier = web::Data::new(GoogleVerifier::new(server_config.google_client_id.clone()));
    let storage = web::Data::new(Storage::from_config(&server_config));
    if server_config.cloudinary.is_some() {
        log::info!("New images are uploaded to Cloudinary");
    }

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);
    let server_config = web::Data::new(server_config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(repo.clone())
            .app_data(keys.clone())
            .app_data(hasher.clone())
            .app_data(verifier.clone())
            .app_data(storage.clone())
            .app_data(server_config.clone())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
