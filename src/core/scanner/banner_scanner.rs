// src/core/scanner/banner_scanner.rs

use crate::core::fetcher::{FetchMethod, Fetcher};
use crate::core::models::ServerInfo;
use crate::core::target::Target;
use std::time::Duration;
use tracing::{debug, info};

/// Reads the `Server` header from a HEAD request to the target.
pub async fn run_banner_scan<F: Fetcher + ?Sized>(fetcher: &F, target: &Target, timeout: Duration) -> ServerInfo {
    match fetcher.fetch(target.url(), FetchMethod::Head, timeout).await {
        Ok(response) => match response.header("server") {
            Some(server) if !server.trim().is_empty() => {
                info!(server, "Server banner detected.");
                ServerInfo { server: server.trim().to_string() }
            }
            _ => {
                debug!("Response carried no Server header.");
                ServerInfo::undetected()
            }
        },
        Err(e) => {
            debug!(error = %e, "Banner request failed.");
            ServerInfo::undetected()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetcher::HttpFetcher;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reads_server_header() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("Server", "nginx/1.25.3"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("banner-test").unwrap();
        let target = Target::parse(&server.uri()).unwrap();
        let info = run_banner_scan(&fetcher, &target, Duration::from_secs(2)).await;
        assert_eq!(info.server, "nginx/1.25.3");
    }

    #[tokio::test]
    async fn missing_header_is_undetected() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("banner-test").unwrap();
        let target = Target::parse(&server.uri()).unwrap();
        let info = run_banner_scan(&fetcher, &target, Duration::from_secs(2)).await;
        assert_eq!(info, ServerInfo::undetected());
    }
}
