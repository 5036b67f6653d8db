//! Salon back-end server entry point.
//!
//! Loads configuration, starts file logging, opens the database and serves
//! the HTTP API until Ctrl+C or SIGTERM.

mod config;

use std::error::Error;

use log::info;
use salon_core::db::open_db;
use salon_http::{serve, AppState};
use tokio::net::TcpListener;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    salon_core::init_logging(&config.log_level, &config.log_dir)?;
    info!(
        "event=config_loaded module=cli status=ok port={} version={}",
        config.port,
        salon_core::core_version()
    );

    let conn = open_db(&config.db_path)?;
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "event=http_bind module=cli status=ok address={}",
        listener.local_addr()?
    );

    serve(listener, AppState::new(conn)).await?;
    Ok(())
}
