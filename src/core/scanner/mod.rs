// src/core/scanner/mod.rs

// Public interface of the `scanner` module: one sub-module per check, plus the
// session orchestration below.
pub mod banner_scanner;
pub mod crawler;
pub mod headers_scanner;
pub mod port_scanner;
pub mod probe_scanner;
pub mod signals;
pub mod ssl_scanner;

use crate::core::config::ScanConfig;
use crate::core::fetcher::Fetcher;
use crate::core::models::{AdvancedAnalysis, Performance, ScanPhase, ScanProgress, ScanReport};
use crate::core::scoring;
use crate::core::target::Target;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{info, warn};

use self::crawler::crawl;
use self::headers_scanner::run_headers_scan;
use self::probe_scanner::{build_tasks, run_probe_scan};
use self::signals::collect_advanced_signals;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn publish(progress: Option<&watch::Sender<ScanProgress>>, phase: ScanPhase, completed: usize, total: usize) {
    if let Some(tx) = progress {
        tx.send_replace(ScanProgress { phase, completed, total });
    }
}

/// Runs a complete scan session and builds its report.
///
/// The crawl finishes before any probe starts. Probing (followed by the header
/// audit) runs concurrently with the advanced signal collection, since the two
/// write disjoint parts of the report. The session always produces a report;
/// an unreachable target shows up as an empty crawl with
/// `target_reachable == false`.
pub async fn run_full_scan<F: Fetcher + ?Sized>(
    fetcher: &F,
    target: &Target,
    config: &ScanConfig,
    progress: Option<&watch::Sender<ScanProgress>>,
) -> ScanReport {
    info!(target = target.url(), workers = config.workers, "Starting scan session.");
    let started = Instant::now();
    let scan_date = Utc::now();

    publish(progress, ScanPhase::Crawling, 0, 0);
    let crawl = crawl(fetcher, target, config).await;
    if !crawl.target_reachable {
        warn!(target = target.url(), "Target did not answer; only advanced signals will be reported.");
    }

    let tasks = build_tasks(crawl.visited.iter().chain(crawl.forms.iter()));
    publish(progress, ScanPhase::Probing, 0, tasks.len());

    let signals_done = AtomicBool::new(false);
    let probe_phase = async {
        let mut findings = run_probe_scan(fetcher, tasks, config, progress).await;
        findings.extend(run_headers_scan(fetcher, target, config).await);
        // Whatever is left of the session is the advanced analysis.
        if !signals_done.load(Ordering::Acquire) {
            publish(progress, ScanPhase::Signals, 0, 1);
        }
        findings
    };
    let signal_phase = async {
        let signals = collect_advanced_signals(fetcher, target, config).await;
        signals_done.store(true, Ordering::Release);
        signals
    };
    let (findings, signals) = tokio::join!(probe_phase, signal_phase);

    let security_score = scoring::score(&findings, signals.open_ports.len(), signals.ssl_check.valid);

    let duration = started.elapsed().as_secs_f64();
    let urls_scanned = crawl.visited.len();
    let average_time_per_url = if urls_scanned == 0 {
        0.0
    } else {
        round2(duration / urls_scanned as f64)
    };

    info!(
        findings = findings.len(),
        score = security_score,
        duration_s = round2(duration),
        "Scan session finished."
    );
    publish(progress, ScanPhase::Done, 1, 1);

    ScanReport {
        target: target.url().to_string(),
        scan_date,
        scan_duration_seconds: round2(duration),
        target_reachable: crawl.target_reachable,
        total_vulnerabilities: findings.len(),
        vulnerabilities: findings,
        crawled_urls: crawl.visited,
        forms_found: crawl.forms,
        performance: Performance {
            urls_scanned,
            threads_used: config.workers,
            average_time_per_url,
        },
        advanced_analysis: AdvancedAnalysis {
            signals,
            security_score,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetcher::{FetchError, FetchMethod, FetchResponse, HttpFetcher};
    use crate::core::models::{FindingKind, Severity};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    /// Keeps the port sweep and TLS check off real services on the test host.
    fn isolated_config() -> ScanConfig {
        let closed = closed_port();
        ScanConfig {
            ports: vec![(closed, "CLOSED".to_string())],
            tls_port: closed,
            crawl_timeout: Duration::from_secs(2),
            port_timeout: Duration::from_millis(300),
            tls_timeout: Duration::from_millis(500),
            ..ScanConfig::default()
        }
    }

    #[tokio::test]
    async fn finds_sql_injection_on_linked_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .and(query_param("id", "' OR '1'='1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "You have an error in your SQL syntax; check the manual that corresponds to your MySQL server version",
            ))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/login">Login</a><form action="/submit"></form></body></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let target = Target::parse(&server.uri()).unwrap();
        let fetcher = HttpFetcher::new("session-test").unwrap();
        let (tx, rx) = watch::channel(ScanProgress::default());
        let report = run_full_scan(&fetcher, &target, &isolated_config(), Some(&tx)).await;

        let login = format!("{}/login", target.origin());
        let sql: Vec<_> = report
            .vulnerabilities
            .iter()
            .filter(|f| f.kind == FindingKind::SqlInjection)
            .collect();
        assert_eq!(sql.len(), 1);
        assert_eq!(sql[0].severity, Severity::High);
        assert_eq!(sql[0].url, login);

        assert!(report.target_reachable);
        assert_eq!(report.crawled_urls, vec![target.url().to_string(), login]);
        assert_eq!(report.forms_found, vec![format!("{}/submit", target.origin())]);
        assert_eq!(report.total_vulnerabilities, report.vulnerabilities.len());
        assert_eq!(rx.borrow().phase, ScanPhase::Done);

        // One HIGH finding, three missing headers, TLS unavailable.
        assert_eq!(report.advanced_analysis.security_score, 100 - 25 - 3 * 5 - 15);
    }

    #[tokio::test]
    async fn unreachable_target_still_produces_a_report() {
        let target = Target::parse(&format!("http://127.0.0.1:{}", closed_port())).unwrap();
        let fetcher = HttpFetcher::new("session-test").unwrap();
        let report = run_full_scan(&fetcher, &target, &isolated_config(), None).await;

        assert!(!report.target_reachable);
        assert!(report.crawled_urls.is_empty());
        assert!(report.forms_found.is_empty());
        assert!(report.vulnerabilities.is_empty());
        assert!(report.advanced_analysis.signals.open_ports.is_empty());
        assert!(!report.advanced_analysis.signals.ssl_check.valid);
        assert_eq!(report.advanced_analysis.security_score, 85);
        assert_eq!(report.performance.average_time_per_url, 0.0);
    }

    #[tokio::test]
    async fn session_runs_on_a_spawned_task() {
        let target = Target::parse(&format!("http://127.0.0.1:{}", closed_port())).unwrap();
        let fetcher = HttpFetcher::new("session-test").unwrap();
        let config = isolated_config();
        let (tx, rx) = watch::channel(ScanProgress::default());

        let report = tokio::spawn(async move { run_full_scan(&fetcher, &target, &config, Some(&tx)).await })
            .await
            .unwrap();

        assert!(!report.target_reachable);
        assert_eq!(rx.borrow().phase, ScanPhase::Done);
    }

    /// Serves an empty root page and holds the banner request until the
    /// advanced analysis phase has been published.
    struct SlowBannerFetcher {
        progress: watch::Receiver<ScanProgress>,
        banner_timeout: Duration,
    }

    #[async_trait]
    impl Fetcher for SlowBannerFetcher {
        async fn fetch(&self, _url: &str, method: FetchMethod, timeout: Duration) -> Result<FetchResponse, FetchError> {
            if method == FetchMethod::Head && timeout == self.banner_timeout {
                let mut progress = self.progress.clone();
                let _ = progress.wait_for(|p| p.phase == ScanPhase::Signals).await;
            }
            Ok(FetchResponse {
                status: 200,
                headers: HashMap::new(),
                body: b"<html></html>".to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn advanced_analysis_phase_is_visible_while_signals_run() {
        let target = Target::parse(&format!("http://127.0.0.1:{}", closed_port())).unwrap();
        let config = ScanConfig {
            banner_timeout: Duration::from_millis(2750),
            ..isolated_config()
        };
        let (tx, rx) = watch::channel(ScanProgress::default());
        let fetcher = SlowBannerFetcher {
            progress: rx.clone(),
            banner_timeout: config.banner_timeout,
        };

        let report = tokio::time::timeout(
            Duration::from_secs(10),
            run_full_scan(&fetcher, &target, &config, Some(&tx)),
        )
        .await
        .expect("banner check never saw the advanced analysis phase");

        assert!(report.target_reachable);
        assert_eq!(rx.borrow().phase, ScanPhase::Done);
    }
}
