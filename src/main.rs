use std::sync::Arc;

use enroll::collaborators::{LoggingAccountCreator, LoggingCodeDispatcher};
use enroll::config::FlowConfig;
use enroll::flow::{FlowRouteState, StepController, flow_routes};

#[tokio::main]
async fn main() -> enroll::error::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = FlowConfig::from_env()?;

    eprintln!("Enroll v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Flow API: http://0.0.0.0:{}/api/flow/status", config.http_port);
    eprintln!("   Cooldown: {}s, code length: {}", config.cooldown_secs, config.code_length);

    // Demo collaborators: the dispatched code is logged, account creation
    // succeeds immediately. Real deployments swap these.
    let controller = StepController::new(
        &config,
        Arc::new(LoggingAccountCreator),
        Arc::new(LoggingCodeDispatcher),
    );
    tracing::info!(flow_id = %controller.flow_id(), "Onboarding flow ready");

    let app = flow_routes(FlowRouteState { controller });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port)).await?;
    tracing::info!(port = config.http_port, "Flow HTTP server started");
    axum::serve(listener, app).await?;

    Ok(())
}
