//! azdo-mcp binary
//!
//! stdout carries the MCP protocol, so console logs go to stderr.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use azdo_core::branding;
use azdo_server::AzdoServer;
use clap::Parser;
use tracing::{error, info};

use cli::Cli;

fn get_logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(branding::APP_IDENTIFIER)
        .join("logs")
}

/// Initialize tracing with a stderr console layer and an optional file layer
///
/// - Console: compact, stderr only
/// - File: daily rotation in ~/.local/share/azdo-mcp/logs/ (Linux)
///   or %LOCALAPPDATA%/azdo-mcp/logs/ (Windows)
fn init_tracing(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // RUST_LOG takes precedence over -v
    let level = cli.log_level();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,azdo_core={level},azdo_server={level},azdo_mcp={level},rmcp=warn"
        ))
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(true);

    let (file_layer, guard) = if cli.no_log_file {
        (None, None)
    } else {
        let logs_dir = get_logs_dir();
        let appender = std::fs::create_dir_all(&logs_dir)
            .map_err(|e| e.to_string())
            .and_then(|_| {
                RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(branding::LOG_PREFIX)
                    .filename_suffix("log")
                    .build(&logs_dir)
                    .map_err(|e| e.to_string())
            });

        match appender {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_target(true);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Warning: file logging disabled: {}", e);
                (None, None)
            }
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    info!(
        version = branding::version(),
        organization = %cli.organization,
        "[Main] Starting {}",
        branding::SERVER_NAME
    );

    let server = match AzdoServer::new(cli.server_config()) {
        Ok(server) => server,
        Err(e) => {
            error!("[Main] Startup failed: {:#}", e);
            return Err(e);
        }
    };

    server.serve_stdio().await
}
