use std::{net::Ipv4Addr, thread, time::Duration};

use anyhow::Context;
use flood_shared::{Client, Config, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PARALLEL: i16 = 4;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::default()
        .with_port(0)
        .with_duration(Duration::from_secs(3));

    let server = Server::bind(config, Ipv4Addr::LOCALHOST.into())?;
    let addr = server.local_addr()?;

    info!("Running {} streams over {}", PARALLEL, addr);

    let (sent, received) = thread::scope(|s| -> anyhow::Result<_> {
        let session = s.spawn(|| server.accept_session());

        let sent = Client::new(config.with_port(addr.port()), "127.0.0.1", PARALLEL)
            .run()
            .context("client side failed")?;

        let received = session
            .join()
            .map_err(|_| anyhow::anyhow!("server thread panicked"))?
            .context("server side failed")?;

        Ok((sent, received))
    })?;

    println!("{sent}");
    println!("{received}");

    Ok(())
}
