//! # Network Transport
//!
//! Raw TCP printing. Most networked label printers accept TSPL on the
//! "raw" port 9100 and close nothing on their side, so the connector shuts
//! down its write half on [`finalize`](Connector::finalize) to signal the
//! end of the session.

use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info};

use super::{Connector, closed};
use crate::error::TsplError;

/// Raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Write timeout per job
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct NetworkConnector {
    peer: SocketAddr,
    stream: Option<TcpStream>,
}

impl NetworkConnector {
    /// Connect to `host` or `host:port` (port defaults to 9100).
    ///
    /// Every resolved address is tried in turn.
    pub fn connect(host: &str) -> Result<Self, TsplError> {
        Self::connect_timeout(host, CONNECT_TIMEOUT)
    }

    pub fn connect_timeout(host: &str, timeout: Duration) -> Result<Self, TsplError> {
        let target = with_default_port(host);
        let addrs = target
            .to_socket_addrs()
            .map_err(|e| TsplError::Transport(format!("Failed to resolve {}: {}", target, e)))?;

        let mut last_error = None;
        for addr in addrs {
            debug!("connecting to {}", addr);
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
                    stream.set_nodelay(true)?;
                    info!("connected to {}", addr);
                    return Ok(Self {
                        peer: addr,
                        stream: Some(stream),
                    });
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(TsplError::Transport(match last_error {
            Some(e) => format!("Failed to connect to {}: {}", target, e),
            None => format!("No addresses found for {}", target),
        }))
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Connector for NetworkConnector {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TsplError> {
        let stream = self.stream.as_mut().ok_or_else(|| closed("network"))?;
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), TsplError> {
        if let Some(stream) = self.stream.take() {
            stream.shutdown(Shutdown::Write)?;
            info!("disconnected from {}", self.peer);
        }
        Ok(())
    }
}

/// Append `:9100` unless the host already names a port.
///
/// Bare IPv6 addresses are bracketed first.
fn with_default_port(host: &str) -> String {
    if host.starts_with('[') {
        if host.contains("]:") {
            host.to_string()
        } else {
            format!("{}:{}", host, DEFAULT_PORT)
        }
    } else if host.matches(':').count() > 1 {
        format!("[{}]:{}", host, DEFAULT_PORT)
    } else if host.contains(':') {
        host.to_string()
    } else {
        format!("{}:{}", host, DEFAULT_PORT)
    }
}
