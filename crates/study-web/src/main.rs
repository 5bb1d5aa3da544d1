//! Study API server
//!
//! ## Usage
//!
//! ```bash
//! study-web                    # Bind address from STUDY_BIND (default 127.0.0.1:4000)
//! study-web --port 8080        # Custom port
//! study-web --host 0.0.0.0     # Listen on all interfaces
//! ```

use std::sync::Arc;
use study_web::{serve, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let mut host_override: Option<String> = None;
    let mut port_override: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host_override = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port_override = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" => {
                println!(
                    r#"
Study API server

USAGE:
    study-web [OPTIONS]

OPTIONS:
    -h, --host <HOST>    Host to bind to [default: from STUDY_BIND]
    -p, --port <PORT>    Port to listen on [default: from STUDY_BIND]
    --help               Print help information

ENVIRONMENT:
    STUDY_BIND                 Bind address [default: 127.0.0.1:4000]
    STUDY_DATA_DIR             Data directory [default: ~/.config/study]
    STUDY_JWT_SECRET           Token signing secret (required)
    STUDY_TOKEN_TTL_SECS       Token lifetime [default: 3600]
    STUDY_CORS_ORIGIN          Allowed CORS origin [default: any]
    STUDY_TUTOR_URL            Collaborator base URL
    STUDY_TUTOR_TIMEOUT_SECS   Collaborator timeout [default: 30]
"#
                );
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = Config::load()?;

    let (host, port) = config
        .bind
        .rsplit_once(':')
        .map(|(h, p)| (h.to_string(), p.to_string()))
        .unwrap_or_else(|| (config.bind.clone(), "4000".to_string()));
    let addr = format!(
        "{}:{}",
        host_override.unwrap_or(host),
        port_override.unwrap_or(port)
    );

    println!("Starting study API server...");

    let state = Arc::new(AppState::new(config)?);

    tracing::info!(
        topics = state.topics.count().await,
        users = state.users.count().await,
        "stores loaded"
    );
    println!("Server ready at http://{}", addr);

    serve(state, &addr).await
}
