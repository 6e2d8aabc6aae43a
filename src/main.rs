use actix_cors::Cors;
use actix_web::{self, http::header, middleware::Logger, App, HttpServer};
use std::sync::LazyLock;
use tokio_util::sync::CancellationToken;

use portfolio_cms::{
    configs::{self, AppServices, CmsConfig},
    constants,
};

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let services = AppServices::build(CmsConfig::from_env(&ENV))
        .await
        .map_err(|e| std::io::Error::other(format!("Storage setup error: {e}")))?;

    let cancel = CancellationToken::new();
    let autosave_task = actix_web::rt::spawn(services.autosave.clone().run(cancel.clone()));

    let frontend_url = ENV.frontend_url.clone();

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    let result = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .service(health_check)
            .configure(configs::configure(services.clone()))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await;

    cancel.cancel();
    if let Err(e) = autosave_task.await {
        log::error!("Auto-save task ended abnormally: {}", e);
    }
    result
}
