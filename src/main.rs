use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use study_quiz_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let bind_address = (config.web_server_host.clone(), config.web_server_port);
    let allowed_origin = config.allowed_origin.clone();

    log::info!(
        "Starting HTTP server on {}:{} (model {}, questions {}..={})",
        bind_address.0,
        bind_address.1,
        config.completion_model,
        config.min_questions,
        config.max_questions
    );

    let state = AppState::new(config);

    HttpServer::new(move || {
        let cors = match &allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .expose_headers(["x-request-id"]),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(handlers::register_endpoints)
    })
    .bind(bind_address)?
    .run()
    .await
}
