// src/core/scanner/ssl_scanner.rs

use tracing::{debug, error, info, warn};

use crate::core::models::{CheckResult, TlsInfo};
use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use std::net::{IpAddr, SocketAddr, TcpStream};
use std::time::Duration;
use tokio::task::spawn_blocking;
use x509_parser::prelude::*;

/// Handshakes with the target's TLS port and summarises its certificate.
///
/// Never fails: any connection, handshake or parsing problem is logged and
/// reported as `TlsInfo::unknown()`.
pub async fn run_ssl_scan(host: &str, addr: Option<IpAddr>, port: u16, timeout: Duration) -> TlsInfo {
    info!(host, port, "Starting SSL/TLS scan.");
    let Some(ip) = addr else {
        warn!(host, "No resolved address, skipping TLS handshake.");
        return TlsInfo::unknown();
    };
    let host_owned = host.to_string();

    debug!("Spawning blocking task for TLS connection.");
    let scan_result = spawn_blocking(move || perform_tls_scan(&host_owned, SocketAddr::new(ip, port), timeout))
        .await
        .unwrap_or_else(|e| {
            error!(panic = %e, "Blocking SSL scan task panicked!");
            Err(format!("Task panicked: {}", e))
        });

    match scan_result {
        Ok(info) => {
            info!(valid = info.valid, issuer = %info.issuer, "SSL/TLS scan finished.");
            info
        }
        Err(e) => {
            warn!(error = %e, "SSL/TLS scan failed, reporting unknown certificate.");
            TlsInfo::unknown()
        }
    }
}

fn perform_tls_scan(host: &str, addr: SocketAddr, timeout: Duration) -> CheckResult<TlsInfo> {
    debug!(host, %addr, "Performing TLS connection and handshake.");

    let connector = TlsConnector::new().map_err(|e| {
        error!(error = %e, "Failed to create TlsConnector");
        format!("TlsConnector Error: {}", e)
    })?;

    let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
        debug!(error = %e, "TCP connection failed");
        format!("TCP Connection Error: {}", e)
    })?;
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|_| stream.set_write_timeout(Some(timeout)))
        .map_err(|e| format!("Socket configuration error: {}", e))?;

    let stream = connector.connect(host, stream).map_err(|e| {
        debug!(error = %e, "TLS handshake failed");
        format!("TLS Handshake Error: {}", e)
    })?;

    let cert = stream
        .peer_certificate()
        .map_err(|e| format!("Could not get peer certificate: {}", e))?
        .ok_or_else(|| "Server did not provide a certificate.".to_string())?;

    let cert_der = cert.to_der().map_err(|e| {
        error!(error = %e, "Failed to convert certificate to DER format");
        format!("Could not convert certificate to DER: {}", e)
    })?;

    let (_, x509) = parse_x509_certificate(&cert_der).map_err(|e| {
        error!(error = %e, "Failed to parse X.509 certificate");
        format!("X.509 Parse Error: {}", e)
    })?;

    info!(subject = %x509.subject(), issuer = %x509.issuer(), "Successfully parsed certificate.");

    let validity = x509.validity();
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);
    let now = Utc::now();

    Ok(TlsInfo {
        valid: now > not_before && now < not_after,
        issuer: issuer_organization(&x509),
        expiration: not_after.to_rfc3339(),
    })
}

/// The issuer's organisation name, or the full issuer DN when it has none.
fn issuer_organization(x509: &X509Certificate<'_>) -> String {
    x509.issuer()
        .iter_organization()
        .next()
        .and_then(|org| org.as_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| x509.issuer().to_string())
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
