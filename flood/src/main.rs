use anyhow::Context;
use clap::Parser;
use flood_shared::{Client, ConnectionType, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::command_line::GlobalArgs;

mod command_line;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = GlobalArgs::parse();
    let config = args.config();

    match args.connection_type() {
        ConnectionType::Server { bind_addr } => {
            info!("Running as server on {}:{}", bind_addr, config.port);

            let server = Server::bind(config, bind_addr)
                .with_context(|| format!("failed to listen on {}:{}", bind_addr, config.port))?;

            server
                .run(|report| println!("{report}"))
                .context("server stopped accepting sessions")?;
        }
        ConnectionType::Client { server, parallel } => {
            info!(
                "Running as client against {}:{} with {} streams for {:?}",
                server, config.port, parallel, config.duration
            );

            let report = Client::new(config, server.as_str(), parallel)
                .run()
                .with_context(|| format!("benchmark against {}:{} failed", server, config.port))?;

            println!("{report}");
        }
    }

    Ok(())
}
