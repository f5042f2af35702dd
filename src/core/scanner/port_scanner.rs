// src/core/scanner/port_scanner.rs

use crate::core::models::OpenPort;
use futures::future::join_all;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info};

/// Attempts a TCP connect to each port; a completed connect marks it open.
///
/// Ports are tried concurrently but reported in the order they were given.
pub async fn run_port_scan(addr: IpAddr, ports: &[(u16, String)], timeout: Duration) -> Vec<OpenPort> {
    info!(%addr, ports = ports.len(), "Starting port sweep.");

    let attempts = ports.iter().map(|(port, service)| async move {
        let socket = SocketAddr::new(addr, *port);
        match time::timeout(timeout, TcpStream::connect(socket)).await {
            Ok(Ok(_stream)) => {
                debug!(port, service = %service, "Port open.");
                Some(OpenPort {
                    port: *port,
                    service: service.clone(),
                })
            }
            Ok(Err(e)) => {
                debug!(port, error = %e, "Port closed.");
                None
            }
            Err(_) => {
                debug!(port, "Port timed out.");
                None
            }
        }
    });

    let open: Vec<OpenPort> = join_all(attempts).await.into_iter().flatten().collect();
    info!(open = open.len(), "Port sweep finished.");
    open
}
