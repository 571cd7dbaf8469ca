// src/core/scanner/redirect_scanner.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::redirect::Policy;
use tracing::{debug, error, info, warn};

use crate::config::constants::{MAX_REDIRECT_HOPS, USER_AGENT};
use crate::core::models::RedirectResult;

/// A single redirect is normal (http to https, apex to www); more than that is suspicious.
pub fn is_suspicious_chain(hop_count: usize) -> bool {
    hop_count > 1
}

fn chain_result(hop_count: usize) -> RedirectResult {
    RedirectResult { had_multiple_redirects: is_suspicious_chain(hop_count), hop_count }
}

/// Follows redirects from the URL and counts the hops.
///
/// A dedicated client is built per scan because the hop counter lives in the
/// redirect policy. A chain cut off after `MAX_REDIRECT_HOPS` still reports the
/// hops followed; any other failure reports an unflagged chain.
pub async fn run_redirect_scan(url: &str, timeout: Duration) -> RedirectResult {
    info!(url, "Starting redirect scan.");

    let hops = Arc::new(AtomicUsize::new(0));
    let recorder = Arc::clone(&hops);
    let policy = Policy::custom(move |attempt| {
        // `previous` holds the original URL plus every redirect already followed.
        recorder.store(attempt.previous().len(), Ordering::Relaxed);
        if attempt.previous().len() > MAX_REDIRECT_HOPS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    });

    let client = match reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(policy)
        .timeout(timeout)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client for redirect scan.");
            return RedirectResult::default();
        }
    };

    match client.get(url).send().await {
        Ok(response) => {
            let hop_count = hops.load(Ordering::Relaxed);
            debug!(final_url = %response.url(), hop_count, "Redirect chain resolved.");
            let result = chain_result(hop_count);
            info!(?result, "Redirect scan finished.");
            result
        }
        Err(e) if e.is_redirect() => {
            let result = chain_result(hops.load(Ordering::Relaxed));
            warn!(url, ?result, "Redirect chain exceeded the hop limit.");
            result
        }
        Err(e) => {
            error!(url, error = %e, "HTTP request failed for redirect scan.");
            RedirectResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hop_is_not_suspicious() {
        assert!(!is_suspicious_chain(0));
        assert!(!is_suspicious_chain(1));
    }

    #[test]
    fn two_hops_are_suspicious() {
        assert!(is_suspicious_chain(2));
        assert!(is_suspicious_chain(MAX_REDIRECT_HOPS));
    }

    #[tokio::test]
    async fn endless_chain_keeps_its_hop_count() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { return };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let reply = "HTTP/1.1 302 Found\r\nLocation: /again\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
                    let _ = socket.write_all(reply.as_bytes()).await;
                });
            }
        });

        let result = run_redirect_scan(&format!("http://{}/", addr), Duration::from_secs(5)).await;
        assert!(result.hop_count > MAX_REDIRECT_HOPS);
        assert!(result.had_multiple_redirects);
    }

    #[tokio::test]
    async fn unreachable_target_is_not_flagged() {
        let result = run_redirect_scan("http://127.0.0.1:9/", Duration::from_secs(2)).await;
        assert_eq!(result, RedirectResult::default());
    }
}
