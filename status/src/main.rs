//! Status server entry point
//!
//! ステータスプラグインを単体のaxumサーバーとして起動する。

use clap::Parser;
use sqlx::SqlitePool;
use status_plugin::cli::Cli;
use status_plugin::shutdown::ShutdownController;
use status_plugin::{
    logging, server, ConfigDefaults, DatabaseProbe, Plugin, PluginConfig, RouteRegistry,
    StatusPlugin,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init().expect("failed to initialize logging");

    let cli = Cli::parse();
    info!("Status server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        error!("Status server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(&cli.bind).await?;
    let listen_addr = listener.local_addr()?;

    let defaults = ConfigDefaults::default().with_listen_addr(listen_addr);
    let mut config = PluginConfig::new(cli.settings()).with_defaults(defaults);

    // 接続は遅延させ、到達不能なDBも起動を妨げず down として報告する
    if let Some(url) = cli.database_url.as_deref() {
        info!("Using database for health probe: {}", url);
        let pool = SqlitePool::connect_lazy(url)?;
        let probe: Arc<dyn DatabaseProbe> = Arc::new(pool);
        config = config.with_database(probe);
    }

    let mut plugin = StatusPlugin::new();
    plugin.initialize(config)?;

    let mut routes = RouteRegistry::new();
    plugin.register_routes(&mut routes)?;

    let shutdown = ShutdownController::default();
    shutdown.listen_for_signals();

    server::serve(listener, routes.into_router(), shutdown).await?;
    Ok(())
}
