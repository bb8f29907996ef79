//! Socket transport helpers.
//!
//! Resolves the configured endpoint and opens the single TCP stream the
//! client owns for the rest of the session.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use adbt_config::DeviceEndpoint;

use crate::ClientError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn connect(endpoint: &DeviceEndpoint) -> Result<TcpStream, ClientError> {
    let endpoint_display = endpoint.to_string();
    let address =
        resolve_tcp_address(endpoint.host(), endpoint.port()).map_err(|source| {
            ClientError::Resolve {
                endpoint: endpoint_display.clone(),
                source,
            }
        })?;

    TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(|source| {
        ClientError::Connect {
            endpoint: endpoint_display,
            source,
        }
    })
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
