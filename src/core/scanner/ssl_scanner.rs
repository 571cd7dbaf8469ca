// src/core/scanner/ssl_scanner.rs

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};
use x509_parser::prelude::*;

use crate::config::constants::TLS_PORT;
use crate::core::knowledge_base::{LOW_ASSURANCE_CAS, REPUTABLE_CAS};
use crate::core::models::{CertificateResult, IssuerRisk};

/// What the handshake produced, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerCertificate {
    pub issuer: String,
    /// `None` when the certificate could not be parsed.
    pub not_after: Option<DateTime<Utc>>,
}

/// Retrieves and classifies the certificate served on port 443.
///
/// Fails closed: any failure to connect, handshake or retrieve a certificate
/// yields `CertificateResult::no_certificate()`.
pub async fn run_ssl_scan(hostname: Option<&str>, timeout: Duration) -> CertificateResult {
    scan_certificate(hostname, TLS_PORT, timeout).await
}

async fn scan_certificate(hostname: Option<&str>, port: u16, timeout: Duration) -> CertificateResult {
    let Some(hostname) = hostname else {
        debug!("No hostname, reporting missing certificate.");
        return CertificateResult::no_certificate();
    };

    info!(hostname, port, "Starting TLS certificate scan.");
    let target_owned = hostname.to_string();

    debug!("Spawning blocking task for TLS connection.");
    let scan_result = spawn_blocking(move || perform_tls_scan(&target_owned, port, timeout))
        .await
        .unwrap_or_else(|e| {
            error!(panic = %e, "Blocking TLS scan task panicked!");
            Err(format!("Task panicked: {}", e))
        });

    let result = match scan_result {
        Ok(peer) => classify_certificate(&peer, Utc::now()),
        Err(e) => {
            warn!(error = %e, "No certificate retrieved.");
            CertificateResult::no_certificate()
        }
    };

    info!(issuer = %result.issuer, expired = result.expired, risk = %result.issuer_risk, "TLS certificate scan finished.");
    result
}

fn perform_tls_scan(target: &str, port: u16, timeout: Duration) -> Result<PeerCertificate, String> {
    debug!(target, "Performing TLS connection and handshake.");

    let connector = TlsConnector::new().map_err(|e| {
        error!(error = %e, "Failed to create TlsConnector");
        format!("TlsConnector Error: {}", e)
    })?;

    let addrs = (target, port)
        .to_socket_addrs()
        .map_err(|e| format!("DNS Resolution Error: {}", e))?;
    let stream = connect_any(addrs, timeout)?;
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|_| stream.set_write_timeout(Some(timeout)))
        .map_err(|e| format!("Socket Error: {}", e))?;

    debug!(target, "Performing TLS handshake.");
    let stream = connector
        .connect(target, stream)
        .map_err(|e| format!("TLS Handshake Error: {}", e))?;

    let cert = match stream.peer_certificate() {
        Ok(Some(c)) => c,
        Ok(None) => return Err("Server did not provide a certificate.".to_string()),
        Err(e) => return Err(format!("Could not get peer certificate: {}", e)),
    };

    let cert_der = cert
        .to_der()
        .map_err(|e| format!("Could not convert certificate to DER: {}", e))?;

    Ok(parse_peer_certificate(&cert_der))
}

/// Connects to the first reachable address, each attempt bounded by `timeout`.
fn connect_any(addrs: impl IntoIterator<Item = SocketAddr>, timeout: Duration) -> Result<TcpStream, String> {
    let mut last_error = None;
    for addr in addrs {
        debug!(%addr, "Connecting TCP stream.");
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!(%addr, error = %e, "Address unreachable, trying the next one.");
                last_error = Some(e);
            }
        }
    }
    Err(match last_error {
        Some(e) => format!("TCP Connection Error: {}", e),
        None => "No address resolved.".to_string(),
    })
}

/// Extracts issuer and expiry from a DER certificate.
///
/// A certificate that does not parse still counts as present, with an empty
/// issuer and an unknown expiry.
pub fn parse_peer_certificate(der: &[u8]) -> PeerCertificate {
    match parse_x509_certificate(der) {
        Ok((_, x509)) => {
            debug!(subject = %x509.subject(), issuer = %x509.issuer(), "Parsed peer certificate.");
            PeerCertificate {
                issuer: x509.issuer().to_string(),
                not_after: asn1_time_to_chrono_utc(&x509.validity().not_after),
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse X.509 certificate.");
            PeerCertificate { issuer: String::new(), not_after: None }
        }
    }
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.timestamp(), 0)
}

/// Grades an issuer distinguished name by the certificate authority it names.
pub fn classify_issuer(issuer: &str) -> IssuerRisk {
    let names = |cas: &[&str]| cas.iter().any(|ca| issuer.contains(ca));
    if issuer.trim().is_empty() {
        IssuerRisk::High
    } else if names(REPUTABLE_CAS) {
        IssuerRisk::Low
    } else if names(LOW_ASSURANCE_CAS) {
        debug!(issuer, "Issuer is a low-assurance CA.");
        IssuerRisk::Medium
    } else {
        debug!(issuer, "Issuer is not a known CA.");
        IssuerRisk::Medium
    }
}

/// Classifies a retrieved certificate. An unknown expiry counts as expired.
pub fn classify_certificate(peer: &PeerCertificate, now: DateTime<Utc>) -> CertificateResult {
    let (not_after, expired) = match peer.not_after {
        Some(not_after) => (not_after.to_rfc2822(), not_after < now),
        None => ("unknown".to_string(), true),
    };
    CertificateResult {
        issuer: peer.issuer.clone(),
        not_after,
        expired,
        issuer_risk: classify_issuer(&peer.issuer),
    }
}
