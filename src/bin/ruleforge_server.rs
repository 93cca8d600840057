//! Ruleforge API Server binary
//!
//! HTTP REST API over the decision-table rule cache.
//! Provides rule CRUD plus fetch, validate, publish and pull-request
//! endpoints.

use clap::Parser;
use ruleforge::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "ruleforge-server")]
#[command(version)]
#[command(author = "RoyalBit Inc. <admin@royalbit.ca>")]
#[command(about = "Ruleforge API Server - HTTP REST API for decision-table rule editing")]
#[command(long_about = r#"
Ruleforge API Server

Provides RESTful endpoints over the in-process rule cache:
  - GET/POST      /api/v1/rules              - List / create rules
  - GET/PUT/DELETE /api/v1/rules/{id}        - Read / replace / delete one rule
  - POST /api/v1/rules/fetch                 - Load rules from a repository's decision table
  - POST /api/v1/rules/validate              - Validate against the last-used template
  - POST /api/v1/rules/publish               - Write rules back and push a branch
  - POST /api/v1/rules/pull-request          - Open a pull request for a pushed branch

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - Tracing and structured logging

Example usage:
  ruleforge-server                           # Start on localhost:8080
  ruleforge-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/rules/fetch \
    -H "Content-Type: application/json" \
    -d '{"url": "https://github.com/acme/rules.git", "branch": "main", "file_path": "tables/discount.xlsx"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "RULEFORGE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "RULEFORGE_PORT")]
    port: u16,

    /// External decision-table compiler command line
    #[arg(
        short,
        long,
        default_value = "drools-compile",
        env = "RULEFORGE_COMPILER"
    )]
    compiler: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        compiler: args.compiler,
    };

    run_api_server(config).await
}
