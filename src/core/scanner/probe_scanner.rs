// src/core/scanner/probe_scanner.rs

use crate::core::config::ScanConfig;
use crate::core::fetcher::{FetchError, FetchMethod, Fetcher};
use crate::core::models::{Finding, FindingKind, ScanPhase, ScanProgress, Severity, VulnClass};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use strum::IntoEnumIterator;
use tokio::sync::watch;
use tracing::{debug, info, trace};
use url::Url;

static RE_SQL_ERRORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)SQL syntax.*MySQL",
        r"(?i)Warning.*mysql_.*",
        r"(?i)PostgreSQL.*ERROR",
        r"(?i)ORA-[0-9]{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const TRAVERSAL_MARKERS: &[&str] = &["root:", "[drivers]"];
const COMMAND_MARKERS: &[&str] = &["uid=", "gid=", "root:"];

impl VulnClass {
    /// Ordered payloads; the first one that triggers detection wins.
    pub fn payloads(self) -> &'static [&'static str] {
        match self {
            VulnClass::Sql => &["' OR '1'='1", "' UNION SELECT NULL--", "1' AND 1=1--"],
            VulnClass::Xss => &["<script>alert('XSS')</script>", "<img src=x onerror=alert('XSS')>"],
            VulnClass::Traversal => &["../../../etc/passwd", r"..\..\..\windows\system32\drivers\etc\hosts"],
            VulnClass::Command => &["; ls", "| whoami", "$(id)"],
        }
    }

    /// Query parameter the payload is sent in.
    pub fn parameter(self) -> &'static str {
        match self {
            VulnClass::Sql => "id",
            VulnClass::Xss => "q",
            VulnClass::Traversal => "file",
            VulnClass::Command => "cmd",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            VulnClass::Sql => Severity::High,
            VulnClass::Xss => Severity::Medium,
            VulnClass::Traversal => Severity::High,
            VulnClass::Command => Severity::Critical,
        }
    }

    pub fn finding_kind(self) -> FindingKind {
        match self {
            VulnClass::Sql => FindingKind::SqlInjection,
            VulnClass::Xss => FindingKind::CrossSiteScripting,
            VulnClass::Traversal => FindingKind::DirectoryTraversal,
            VulnClass::Command => FindingKind::CommandInjection,
        }
    }

    fn description(self) -> &'static str {
        match self {
            VulnClass::Sql => "SQL error detected in the response",
            VulnClass::Xss => "Injected script reflected unescaped in the response",
            VulnClass::Traversal => "Unauthorized access to system files detected",
            VulnClass::Command => "System command execution detected",
        }
    }

    /// Whether a response body shows that `payload` took effect.
    pub fn detects(self, payload: &str, body: &str) -> bool {
        match self {
            VulnClass::Sql => RE_SQL_ERRORS.iter().any(|re| re.is_match(body)),
            VulnClass::Xss => body.contains(payload),
            VulnClass::Traversal => TRAVERSAL_MARKERS.iter().any(|m| body.contains(m)),
            VulnClass::Command => COMMAND_MARKERS.iter().any(|m| body.contains(m)),
        }
    }
}

/// One (surface, class) unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTask {
    pub surface: String,
    pub class: VulnClass,
}

/// Result of a single task. `Clean` and `Failed` both contribute no finding.
#[derive(Debug)]
pub enum ProbeOutcome {
    Finding(Finding),
    Clean,
    Failed(FetchError),
}

/// Cross-product of every surface with every class, surfaces first.
pub fn build_tasks<'a, I>(surfaces: I) -> Vec<ProbeTask>
where
    I: IntoIterator<Item = &'a String>,
{
    surfaces
        .into_iter()
        .flat_map(|surface| {
            VulnClass::iter().map(move |class| ProbeTask {
                surface: surface.clone(),
                class,
            })
        })
        .collect()
}

fn probe_url(surface: &str, class: VulnClass, payload: &str) -> Result<String, FetchError> {
    let mut url = Url::parse(surface).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", surface, e)))?;
    url.query_pairs_mut().append_pair(class.parameter(), payload);
    Ok(url.to_string())
}

/// Tries the class payloads in order and stops at the first detection.
///
/// A fetch error on one payload moves on to the next; the task only reports
/// `Failed` when no payload got a response at all.
pub async fn run_probe<F: Fetcher + ?Sized>(fetcher: &F, task: &ProbeTask, config: &ScanConfig) -> ProbeOutcome {
    let mut last_error = None;
    let mut answered = false;

    for payload in task.class.payloads() {
        let url = match probe_url(&task.surface, task.class, payload) {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::Failed(e),
        };
        match fetcher.fetch(&url, FetchMethod::Get, config.probe_timeout).await {
            Ok(response) => {
                answered = true;
                if task.class.detects(payload, &response.text()) {
                    debug!(surface = %task.surface, class = %task.class, payload, "Detection matched.");
                    return ProbeOutcome::Finding(Finding::new(
                        task.class.finding_kind(),
                        &task.surface,
                        payload,
                        task.class.severity(),
                        task.class.description().to_string(),
                    ));
                }
            }
            Err(e) => {
                trace!(url = %url, error = %e, "Probe request failed.");
                last_error = Some(e);
            }
        }
    }

    match (answered, last_error) {
        (false, Some(e)) => ProbeOutcome::Failed(e),
        _ => ProbeOutcome::Clean,
    }
}

/// Runs every task on a pool of `config.workers` concurrent probes.
///
/// Completions are drained on this task only; each completed task contributes
/// its own findings to the aggregate, so the finding set does not depend on
/// the pool size or on completion order.
pub async fn run_probe_scan<F: Fetcher + ?Sized>(
    fetcher: &F,
    tasks: Vec<ProbeTask>,
    config: &ScanConfig,
    progress: Option<&watch::Sender<ScanProgress>>,
) -> Vec<Finding> {
    let total = tasks.len();
    let workers = config.workers.max(1);
    info!(tasks = total, workers, "Starting probe scan.");

    let interval = config.progress_interval.max(1);
    let mut completed = 0usize;
    let mut failed = 0usize;
    let mut findings = Vec::new();

    // Each future owns its task so the pool stays `Send` inside a spawned session.
    let mut completions = stream::iter(tasks)
        .map(|task| async move { run_probe(fetcher, &task, config).await })
        .buffer_unordered(workers);

    while let Some(outcome) = completions.next().await {
        completed += 1;
        match outcome {
            ProbeOutcome::Finding(finding) => findings.push(finding),
            ProbeOutcome::Clean => {}
            ProbeOutcome::Failed(_) => failed += 1,
        }

        if completed % interval == 0 || completed == total {
            let update = ScanProgress {
                phase: ScanPhase::Probing,
                completed,
                total,
            };
            debug!(completed, total, percent = update.percent(), "Probe progress.");
            if let Some(tx) = progress {
                tx.send_replace(update);
            }
        }
    }

    info!(findings = findings.len(), failed, "Probe scan finished.");
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetcher::{FetchResponse, HttpFetcher};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answers from the request URL alone, with a URL-dependent delay so
    /// completion order differs from submission order.
    struct ScriptedFetcher;

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str, _method: FetchMethod, _timeout: Duration) -> Result<FetchResponse, FetchError> {
            let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
            tokio::time::sleep(Duration::from_millis((url.len() % 7) as u64)).await;

            let query: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
            let body = match (parsed.path(), query.first()) {
                ("/down", _) => return Err(FetchError::Connect("refused".to_string())),
                ("/db", Some((k, v))) if k == "id" && v.contains("UNION") => {
                    "Warning: mysql_fetch_array() expects parameter 1".to_string()
                }
                ("/echo", Some((k, v))) if k == "q" => format!("<p>You searched {}</p>", v),
                ("/files", Some((k, v))) if k == "file" && v.contains("windows") => "[fonts]\n[drivers]".to_string(),
                ("/shell", Some((k, _))) if k == "cmd" => "uid=0(root) gid=0(root)".to_string(),
                _ => "<html>nothing here</html>".to_string(),
            };
            Ok(FetchResponse {
                status: 200,
                body: body.into_bytes(),
                ..FetchResponse::default()
            })
        }
    }

    fn surfaces() -> Vec<String> {
        ["/db", "/echo", "/files", "/shell", "/plain", "/down"]
            .iter()
            .map(|p| format!("http://example.test{}", p))
            .collect()
    }

    #[test]
    fn task_universe_is_the_full_cross_product() {
        let surfaces = surfaces();
        let tasks = build_tasks(&surfaces);
        assert_eq!(tasks.len(), surfaces.len() * 4);
        assert_eq!(tasks[0], ProbeTask { surface: surfaces[0].clone(), class: VulnClass::Sql });
        assert_eq!(tasks[3].class, VulnClass::Command);
    }

    #[test]
    fn detection_predicates() {
        assert!(VulnClass::Sql.detects("x", "You have an error in your SQL syntax; check the manual for your MySQL server"));
        assert!(VulnClass::Sql.detects("x", "ORA-01756: quoted string not properly terminated"));
        assert!(!VulnClass::Sql.detects("x", "all good"));
        assert!(VulnClass::Xss.detects("<b>", "a <b> c"));
        assert!(!VulnClass::Xss.detects("<b>", "a &lt;b&gt; c"));
        assert!(VulnClass::Traversal.detects("x", "root:x:0:0:root:/root:/bin/bash"));
        assert!(VulnClass::Command.detects("x", "uid=1000(app)"));
    }

    #[test]
    fn payload_is_appended_to_existing_query() {
        let url = probe_url("http://example.test/item?page=2", VulnClass::Sql, "' OR '1'='1").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));
        assert_eq!(pairs[1], ("id".to_string(), "' OR '1'='1".to_string()));
    }

    #[tokio::test]
    async fn first_matching_payload_wins() {
        let config = ScanConfig::default();
        let task = ProbeTask { surface: "http://example.test/db".to_string(), class: VulnClass::Sql };
        match run_probe(&ScriptedFetcher, &task, &config).await {
            ProbeOutcome::Finding(finding) => {
                assert_eq!(finding.payload, "' UNION SELECT NULL--");
                assert_eq!(finding.severity, Severity::High);
                assert_eq!(finding.kind, FindingKind::SqlInjection);
            }
            other => panic!("expected a finding, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failures_and_clean_probes_are_distinguished() {
        let config = ScanConfig::default();
        let down = ProbeTask { surface: "http://example.test/down".to_string(), class: VulnClass::Xss };
        assert!(matches!(run_probe(&ScriptedFetcher, &down, &config).await, ProbeOutcome::Failed(_)));

        let plain = ProbeTask { surface: "http://example.test/plain".to_string(), class: VulnClass::Xss };
        assert!(matches!(run_probe(&ScriptedFetcher, &plain, &config).await, ProbeOutcome::Clean));
    }

    #[tokio::test]
    async fn finding_set_is_independent_of_worker_count() {
        let surfaces = surfaces();
        let mut results = Vec::new();

        for workers in [1, 5, 20] {
            let config = ScanConfig { workers, progress_interval: 3, ..ScanConfig::default() };
            let findings = run_probe_scan(&ScriptedFetcher, build_tasks(&surfaces), &config, None).await;
            results.push(findings.into_iter().collect::<HashSet<Finding>>());
        }

        // sql on /db, xss on /echo, traversal on /files, command on /shell
        assert_eq!(results[0].len(), 4);
        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }

    #[tokio::test]
    async fn publishes_progress_until_complete() {
        let surfaces = surfaces();
        let (tx, rx) = watch::channel(ScanProgress::default());
        let config = ScanConfig { progress_interval: 5, ..ScanConfig::default() };

        run_probe_scan(&ScriptedFetcher, build_tasks(&surfaces), &config, Some(&tx)).await;

        let last = *rx.borrow();
        assert_eq!(last.phase, ScanPhase::Probing);
        assert_eq!(last.completed, surfaces.len() * 4);
        assert_eq!(last.percent(), 100);
    }

    #[tokio::test]
    async fn detects_sql_error_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .and(query_param("id", "' OR '1'='1"))
            .respond_with(ResponseTemplate::new(500).set_body_string(
                "You have an error in your SQL syntax; check the manual that corresponds to your MySQL server version",
            ))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("login form"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("probe-test").unwrap();
        let surfaces = vec![format!("{}/login", server.uri())];
        let findings = run_probe_scan(&fetcher, build_tasks(&surfaces), &ScanConfig::default(), None).await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::SqlInjection);
        assert_eq!(findings[0].payload, "' OR '1'='1");
        assert_eq!(findings[0].url, surfaces[0]);
    }
}
