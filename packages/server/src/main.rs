#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident watch server binary.
//!
//! ```text
//! incident_watch_server [--config dashboard.toml] [--bind 127.0.0.1] [--port 8080]
//! ```

use std::path::PathBuf;

use clap::Parser;
use incident_watch_server::{ServerOptions, run_server};

#[derive(Parser)]
#[command(
    name = "incident_watch_server",
    about = "Serve the incident watch dashboard API and offline shell"
)]
struct Cli {
    /// Dashboard config file (TOML). Defaults apply when omitted.
    #[arg(long, env = "INCIDENT_WATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Origin serving the shell assets cached for offline use
    #[arg(long, env = "SHELL_ORIGIN", default_value = "http://127.0.0.1:5173")]
    shell_origin: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    run_server(ServerOptions {
        config_path: cli.config,
        bind_addr: cli.bind,
        port: cli.port,
        shell_origin: cli.shell_origin,
    })
    .await
}
