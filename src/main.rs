use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use citizenly_backend::api::{HealthApi, JurisdictionApi, SignupApi};
use citizenly_backend::app_data::AppData;
use citizenly_backend::config::{init_logging, BootstrapSettings, DatabaseConnections, RetrySettings};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = BootstrapSettings::from_env().expect("Failed to load bootstrap settings");
    let retry_settings = RetrySettings::from_env().expect("Failed to load retry settings");

    tracing::info!(?settings, ?retry_settings, "Configuration loaded");

    // Connect to both databases and run migrations
    let connections = DatabaseConnections::init(&settings)
        .await
        .expect("Failed to connect to databases");

    connections
        .migrate()
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database migrations completed");

    let app_data = Arc::new(AppData::init(connections, &settings, &retry_settings));

    // Create API implementations
    let signup_api = SignupApi::new(app_data.clone());
    let jurisdiction_api = JurisdictionApi::new(app_data.clone());

    // Create OpenAPI service with API implementations
    let api_service = OpenApiService::new(
        (HealthApi, signup_api, jurisdiction_api),
        "Citizenly RBI API",
        "1.0.0",
    )
    .server(format!("http://{}/api", settings.server_address()));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(address = %settings.server_address(), "Starting server");

    Server::new(TcpListener::bind(settings.server_address()))
        .run(app)
        .await
}
