use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::adapters::{HttpItemSource, HttpRecordStore};
use backend::cors_middleware;
use backend::routes;
use backend::AppState;
use backend::Settings;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Priceduel Backend on http://{}:{}",
        settings.host, settings.port
    );

    let http_client = reqwest::Client::new();
    let items = Arc::new(HttpItemSource::new(
        http_client.clone(),
        settings.item_api_base_url.clone(),
    ));
    let records = Arc::new(HttpRecordStore::new(
        http_client,
        settings.game_api_base_url.clone(),
    ));

    let app_state = AppState::build(&settings, items, records);
    let data = web::Data::new(app_state);
    let (host, port) = (settings.host.clone(), settings.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
