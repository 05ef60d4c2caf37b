use std::time::SystemTimeError;

use renet::transport::NetcodeTransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport error: {0}")]
    Transport(#[from] NetcodeTransportError),
    #[error("system clock is set before the unix epoch: {0}")]
    Clock(#[from] SystemTimeError),
}
