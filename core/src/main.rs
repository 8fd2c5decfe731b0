use std::process;
use std::sync::Arc;
use token_gateway::settings::load_config;
use token_gateway::{create_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // -------------------------------
    // Load configuration
    // -------------------------------
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // -------------------------------
    // Initialize Tracing / Logging
    // -------------------------------
    let filter = match EnvFilter::try_new(&config.rust_log) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid RUST_LOG directive {:?}: {}", config.rust_log, e);
            process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Token gateway starting...");
    tracing::info!("Token gateway initialized with config: {:?}", config);

    let state = match AppState::from_config(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize gateway: {}", e);
            process::exit(1);
        }
    };
    tracing::info!(
        network = %state.network.name,
        chain_id = state.network.chain_id,
        signer = %state.submitter.signer_address(),
        contract = %state.submitter.contract_address(),
        "Signing identity ready"
    );

    let app = create_app(state);

    // -------------------------------
    // Run Server
    // -------------------------------
    let bind_addr = format!("0.0.0.0:{}", config.server_port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", bind_addr, e);
            process::exit(1);
        }
    };

    tracing::info!("Server listening on http://{}", bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }
}
