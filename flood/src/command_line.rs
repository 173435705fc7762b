use std::{net::IpAddr, num::NonZeroU64, time::Duration};

use clap::{ArgGroup, Parser};
use flood_shared::{config::DEFAULT_PORT, Config, ConnectionType};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["server", "client"])))]
pub struct GlobalArgs {
    /// Launch server
    #[arg(short, long)]
    pub server: bool,
    /// Launch client and connect to server
    #[arg(short, long, value_name = "HOST")]
    pub client: Option<String>,
    /// Number of parallel streams
    #[arg(short = 'P', long, default_value_t = 1, value_parser = clap::value_parser!(i16).range(1..))]
    pub parallel: i16,
    /// Test duration in seconds
    #[arg(short, long, default_value_t = NonZeroU64::new(10).unwrap())]
    pub time: NonZeroU64,
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Address the server listens on
    #[arg(short = 'B', long, default_value = "0.0.0.0")]
    pub bind: IpAddr,
}

impl GlobalArgs {
    pub fn config(&self) -> Config {
        Config::default()
            .with_port(self.port)
            .with_duration(Duration::from_secs(self.time.get()))
    }

    pub fn connection_type(&self) -> ConnectionType {
        match &self.client {
            Some(server) => ConnectionType::Client {
                server: server.clone(),
                parallel: self.parallel,
            },
            None => ConnectionType::Server {
                bind_addr: self.bind,
            },
        }
    }
}
