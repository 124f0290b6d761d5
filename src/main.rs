use anyhow::Context;

use email_triage::api::{AppState, api_routes};
use email_triage::classifier::EmailClassifier;
use email_triage::config::AppConfig;
use email_triage::llm::create_optional_provider;
use email_triage::reply::{GeneratorConfig, ResponseGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = AppConfig::from_env().context("Invalid configuration")?;

    let _log_guard = email_triage::logging::init(config.log_dir.as_deref())?;

    let llm = create_optional_provider(config.llm.as_ref());

    eprintln!("📬 Email Triage v{}", env!("CARGO_PKG_VERSION"));
    match &llm {
        Some(provider) => eprintln!("   Model: {}", provider.model_name()),
        None => eprintln!("   Model: none (keyword heuristic and canned replies)"),
    }
    eprintln!("   API: http://{}/api/classify", config.server.bind_addr());
    eprintln!("   Health: http://{}/health", config.server.bind_addr());
    if let Some(dir) = &config.server.static_dir {
        eprintln!("   Frontend: {}", dir.display());
    }
    if let Some(dir) = &config.log_dir {
        eprintln!("   Logs: {}", dir.display());
    }
    eprintln!();

    let state = AppState::new(
        EmailClassifier::new(llm.clone()),
        ResponseGenerator::new(llm, GeneratorConfig::default()),
    );
    let app = api_routes(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr()))?;
    tracing::info!(addr = %config.server.bind_addr(), "Email triage server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
