//! openGauss MCP Server - Main entry point.
//!
//! This server lets MCP clients browse the tables of an openGauss database
//! and run SQL against it over stdio.

use opengauss_mcp_server::config::Config;
use opengauss_mcp_server::db::PgConnector;
use opengauss_mcp_server::mcp::GaussService;
use opengauss_mcp_server::transport::{StdioTransport, Transport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr: stdout carries the MCP protocol.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse_args();

    init_tracing(&config);

    let connection = match config.connection_config() {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!(
                "Usage: opengauss-mcp-server --user <user> --password <password> --dbname <name>"
            );
            eprintln!();
            eprintln!("Or set OPENGAUSS_USER, OPENGAUSS_PASSWORD and OPENGAUSS_DBNAME");
            eprintln!("(OPENGAUSS_HOST and OPENGAUSS_PORT default to localhost:5432).");
            std::process::exit(1);
        }
    };

    info!(
        target_db = %connection.target(),
        request_timeout_secs = connection.request_timeout.map(|t| t.as_secs()),
        "Starting openGauss MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let database = connection.database.clone();
    let service = GaussService::new(PgConnector::new(connection), database);
    let transport = StdioTransport::new(service);

    if let Err(e) = transport.run().await {
        error!(error = %e, transport = transport.name(), "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
