mod gemini;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use gemini::GeminiClient;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let frontend_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        format!("{}/../frontend/dist", manifest_dir)
    } else {
        "/usr/src/app/frontend/dist".to_string()
    };

    let model = match GeminiClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to configure Gemini client: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    log::info!("Gemini client ready (model: {})", model.model_name());

    let port = env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let bind_address = format!("0.0.0.0:{}", port);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(model.clone()))
            .configure(|cfg| configure_routes::<GeminiClient>(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
