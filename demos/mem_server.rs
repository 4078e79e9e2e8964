//! Serve an in-memory platform over HTTP.
//!
//! Run with: `cargo run --example mem_server --features "server mem"`,
//! then seed it with the CLI: `lyra seed --url http://localhost:3000`.

use lyra::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let platform = MemPlatform::new();

    // Don't leave the token unset outside demos; the admin surface is open
    // without one.
    let config = LyraServerConfig {
        admin_token: env::var("LYRA_ADMIN_TOKEN").ok(),
    };
    let app = LyraServer::new(config).build(platform);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    println!("Platform listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
