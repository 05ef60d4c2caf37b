mod config;
mod error;
mod game_lobby;
mod notifier;
mod remote_sink;
mod session_directory;

use crate::{
    config::Config,
    error::ServerError,
    game_lobby::GameLobby,
    notifier::Sink,
    remote_sink::{Outbound, RemoteSink},
};
use clap::Parser;
use log::{error, info, warn};
use renet::{
    transport::{NetcodeServerTransport, ServerAuthentication, ServerConfig},
    ClientId, ConnectionConfig, DefaultChannel, RenetServer, ServerEvent,
};
use scopa_core::{
    events::{ClientEvent, GameEvent},
    user_name::Username,
};
use std::{
    collections::HashMap,
    net::UdpSocket,
    time::{Instant, SystemTime},
};
use tokio::{sync::mpsc::channel, time};

fn send_event(server: &mut RenetServer, client_id: ClientId, event: &GameEvent) {
    match serde_json::to_string(event) {
        Ok(s) => server.send_message(client_id, DefaultChannel::ReliableOrdered, s),
        Err(e) => error!("could not encode event for {}: {}", client_id, e),
    }
}

fn username_of(transport: &NetcodeServerTransport, client_id: ClientId) -> Username {
    transport
        .user_data(client_id)
        .map(|data| Username::from_user_data(&data))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| Username::from_string(client_id.to_string()))
}

async fn serve(config: Config) -> Result<(), ServerError> {
    let public_addr = config.public_addr();
    let mut server: RenetServer = RenetServer::new(ConnectionConfig::default());

    let current_time = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?;
    let server_config = ServerConfig {
        current_time,
        max_clients: config.max_clients,
        protocol_id: config.protocol_id,
        public_addresses: vec![public_addr],
        authentication: ServerAuthentication::Unsecure,
    };
    let socket: UdpSocket = UdpSocket::bind(public_addr)?;
    let mut transport = NetcodeServerTransport::new(server_config, socket)?;
    info!("listening on {}", public_addr);

    // Every request runs to completion inside this loop, so plays on one
    // match never interleave.
    let mut lobby = GameLobby::new();
    let mut usernames: HashMap<ClientId, Username> = HashMap::new();
    let (outbound_tx, mut outbound_rx) = channel::<Outbound>(config.outbound_capacity);
    let mut interval = time::interval(config.tick());
    let mut last_updated = Instant::now();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let now = Instant::now();
        let duration = now - last_updated;
        last_updated = now;

        server.update(duration);
        transport.update(duration, &mut server)?;

        while let Some(event) = server.get_event() {
            match event {
                ServerEvent::ClientConnected { client_id } => {
                    let username = username_of(&transport, client_id);
                    info!("client {} connected as '{}'", client_id, username.to_str());
                    usernames.insert(client_id, username);
                }
                ServerEvent::ClientDisconnected { client_id, reason } => {
                    info!("client {} disconnected: {}", client_id, reason);
                    usernames.remove(&client_id);
                    lobby.disconnect(client_id.raw());
                }
            }
        }

        for client_id in server.clients_id() {
            while let Some(message) =
                server.receive_message(client_id, DefaultChannel::ReliableOrdered)
            {
                let Some(username) = usernames.get(&client_id) else {
                    continue;
                };
                let event = match serde_json::from_slice::<ClientEvent>(&message) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("ignoring malformed message from {}: {}", client_id, e);
                        continue;
                    }
                };
                let sender = outbound_tx.clone();
                let replies = lobby.handle(
                    client_id.raw(),
                    &username.to_str(),
                    event,
                    move || -> Box<dyn Sink> { Box::new(RemoteSink::new(client_id, sender)) },
                );
                for reply in replies.iter() {
                    send_event(&mut server, client_id, reply);
                }
            }
        }

        while let Ok(outbound) = outbound_rx.try_recv() {
            send_event(&mut server, outbound.client_id, &outbound.event);
        }

        transport.send_packets(&mut server);

        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                info!("shutting down");
                server.disconnect_all();
                transport.send_packets(&mut server);
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let config = Config::parse();
    if let Err(e) = serve(config).await {
        error!("server stopped: {}", e);
        std::process::exit(1);
    }
}
