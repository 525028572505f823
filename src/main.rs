use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use tasknest::{
    auth::{AuthMiddleware, TokenService},
    config::Config,
    routes,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Bring the schema up to date before accepting requests.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let token_service = TokenService::from_config(&config);

    log::info!("Starting TaskNest server at http://{}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
