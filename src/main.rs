use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_digest::{
    api::routes::create_router, config::Config, llm::OpenRouterClient, pipeline::Pipeline,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,web_digest=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    tracing::info!(model = %config.llm.model, "starting web-digest on {}", server_addr);

    let generator = Arc::new(OpenRouterClient::new(config.llm.clone()));
    let pipeline = Pipeline::new(&config.pipeline, generator)?;
    let app_state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = create_router(app_state);
    let listener = TcpListener::bind(server_addr).await?;

    tracing::info!("listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
