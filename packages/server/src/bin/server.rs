//! REST + WebSocket server.
//!
//! Clients connect on `/ws` and receive every event published through
//! `POST /api/events`.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=secret DATABASE_URL=postgres://localhost/app cargo run --bin rest-websockets-server
//! cargo run --bin rest-websockets-server -- --port 5050 --jwt-secret secret --database-url postgres://localhost/app
//! ```

use clap::Parser;

use rest_websockets_server::{
    config::{DEFAULT_OUTBOUND_BUFFER, ServerConfig},
    ui::Server,
};
use rest_websockets_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "rest-websockets-server")]
#[command(about = "REST API server with WebSocket event broadcasting", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Secret used to validate tokens
    #[arg(long, env = "JWT_SECRET", default_value = "", hide_env_values = true)]
    jwt_secret: String,

    /// Connection string of the database
    #[arg(long, env = "DATABASE_URL", default_value = "", hide_env_values = true)]
    database_url: String,

    /// Messages buffered per client before it is dropped as too slow
    #[arg(long, env = "OUTBOUND_BUFFER", default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            jwt_secret: args.jwt_secret,
            database_url: args.database_url,
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let server = match Server::new(args.into()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
