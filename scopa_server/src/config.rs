use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about = "Two-player Scopa match server", long_about = None)]
pub struct Config {
    /// UDP port to listen on
    #[arg(default_value_t = 6969)]
    pub port: u16,
    /// Address to bind and advertise
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(long, default_value_t = 64)]
    pub max_clients: usize,
    /// Must match the protocol id clients connect with
    #[arg(long, default_value_t = 0)]
    pub protocol_id: u64,
    /// Milliseconds between transport updates
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,
    /// Events that may wait for the next tick before a client sink is dropped
    #[arg(long, default_value_t = 256)]
    pub outbound_capacity: usize,
}

impl Config {
    pub fn public_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}
