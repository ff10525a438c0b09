//! Cooling Controller Link
//!
//! Plain-text command protocol over TCP. Commands are ASCII lines terminated
//! by CRLF; the controller answers status requests (`PTC`) with one or more
//! lines such as `T1 -150.2`, separated by runs of blank lines.

mod command;
mod error;
mod link;

pub use command::{clean_response, encode_command, COMMAND_TERMINATOR, STATUS_COMMAND};
pub use error::ControllerError;
pub use link::{ControllerLink, ControllerReader, ControllerWriter};

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Default controller address
pub const DEFAULT_COOLER_IP: &str = "192.168.3.1";

/// Default controller port
pub const DEFAULT_COOLER_PORT: u16 = 9760;

/// Local address the lab network assigns to the monitoring machine
pub const DEFAULT_LOCAL_IP: &str = "192.168.3.118";

/// Default local port when binding to [`DEFAULT_LOCAL_IP`]
pub const DEFAULT_LOCAL_PORT: u16 = 9760;

/// Default response timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default delay between status requests in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Default maximum response size in bytes
pub const DEFAULT_RECV_BUFFER: usize = 512;

/// Controller connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Controller IP address
    pub cooler_ip: String,
    /// Controller TCP port
    pub cooler_port: u16,
    /// Local IP to bind before connecting (none lets the OS choose)
    pub local_ip: Option<String>,
    /// Local port used with `local_ip`
    pub local_port: u16,
    /// Connect and response timeout in milliseconds
    pub timeout_ms: u64,
    /// Delay between status requests in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum bytes read per response
    pub recv_buffer: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cooler_ip: DEFAULT_COOLER_IP.to_string(),
            cooler_port: DEFAULT_COOLER_PORT,
            local_ip: None,
            local_port: DEFAULT_LOCAL_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            recv_buffer: DEFAULT_RECV_BUFFER,
        }
    }
}

impl ControllerConfig {
    /// Controller socket address
    pub fn cooler_addr(&self) -> Result<SocketAddr, ControllerError> {
        socket_addr(&self.cooler_ip, self.cooler_port)
    }

    /// Local bind address, if one is configured
    pub fn local_addr(&self) -> Result<Option<SocketAddr>, ControllerError> {
        self.local_ip
            .as_deref()
            .map(|ip| socket_addr(ip, self.local_port))
            .transpose()
    }

    /// Response timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay between status requests
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn socket_addr(ip: &str, port: u16) -> Result<SocketAddr, ControllerError> {
    let ip: IpAddr = ip
        .trim()
        .parse()
        .map_err(|_| ControllerError::InvalidAddress(ip.to_string()))?;
    Ok(SocketAddr::new(ip, port))
}
