use remitdesk_api::config::{self, ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    remitdesk_observability::init(&config::log_settings(|key| std::env::var(key).ok()));

    // No fallback secret: refuse to start rather than sign with a guessable key.
    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return Err(e.into());
        }
    };

    let app = remitdesk_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
