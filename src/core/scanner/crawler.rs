// src/core/scanner/crawler.rs

use crate::core::config::ScanConfig;
use crate::core::fetcher::{FetchMethod, Fetcher};
use crate::core::target::Target;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Only the first links of each page are followed.
pub const MAX_LINKS_PER_PAGE: usize = 8;

static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href=['"]?([^'" >]+)"#).unwrap());

/// What the crawl phase hands over to the probe phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Every URL that answered, in visit order. No duplicates.
    pub visited: Vec<String>,
    /// Resolved form actions. Repeats are kept.
    pub forms: Vec<String>,
    pub target_reachable: bool,
}

/// Dedup key: `/docs` and `/docs/` count as the same page.
fn crawl_key(url: &str) -> &str {
    url.trim_end_matches('/')
}

#[derive(Default)]
struct CrawlState {
    attempted: HashSet<String>,
    visited: Vec<String>,
    forms: Vec<String>,
}

/// Depth-first discovery of same-origin pages and form actions.
///
/// The traversal uses an explicit stack of `(url, depth)` pairs; children are
/// pushed in reverse so pages are visited in the order their links appear in
/// the markup. A URL is fetched at most once. Fetch failures make the URL a dead
/// end and never abort the crawl.
pub async fn crawl<F: Fetcher + ?Sized>(fetcher: &F, target: &Target, config: &ScanConfig) -> CrawlOutcome {
    info!(target = target.url(), max_depth = config.max_depth, "Starting crawl.");
    let started = Instant::now();
    let mut state = CrawlState::default();
    let mut target_reachable = false;

    let mut stack: Vec<(String, usize)> = Vec::new();
    if config.max_depth > 0 {
        stack.push((target.url().to_string(), 0));
    }

    while let Some((url, depth)) = stack.pop() {
        if started.elapsed() > config.crawl_budget {
            warn!(pending = stack.len() + 1, "Crawl budget exhausted, stopping traversal.");
            break;
        }
        if !state.attempted.insert(crawl_key(&url).to_string()) {
            continue;
        }

        let response = match fetcher.fetch(&url, FetchMethod::Get, config.crawl_timeout).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Fetch failed, treating as dead end.");
                continue;
            }
        };
        debug!(url = %url, depth, status = response.status, "Visited.");
        if crawl_key(&url) == crawl_key(target.url()) {
            target_reachable = true;
        }
        state.visited.push(url.clone());

        let body = response.text();
        state.forms.extend(extract_forms(&body, target, &url));

        if depth + 1 < config.max_depth {
            let children: Vec<String> = extract_links(&body, target, &url)
                .into_iter()
                .filter(|link| link.contains(target.origin()) && !state.attempted.contains(crawl_key(link)))
                .collect();
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    info!(
        visited = state.visited.len(),
        forms = state.forms.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Crawl finished."
    );
    CrawlOutcome {
        visited: state.visited,
        forms: state.forms,
        target_reachable,
    }
}

/// Outbound links of a page, capped before resolution.
fn extract_links(body: &str, target: &Target, page_url: &str) -> Vec<String> {
    RE_LINK
        .captures_iter(body)
        .take(MAX_LINKS_PER_PAGE)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| resolve_url(m.as_str(), target, page_url))
        .collect()
}

/// Form actions of a page, in document order. No cap.
fn extract_forms(body: &str, target: &Target, page_url: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("form[action]") else {
        return Vec::new();
    };
    let document = Html::parse_document(body);
    document
        .select(&selector)
        .filter_map(|form| form.value().attr("action"))
        .filter_map(|action| resolve_url(action, target, page_url))
        .collect()
}

/// Absolute links are kept as-is, root-relative ones are appended to the
/// target origin and anything else is joined to the current page. Only the
/// fragment is dropped; a trailing slash is kept so directory pages are
/// fetched and joined against as directories.
pub(crate) fn resolve_url(raw: &str, target: &Target, page_url: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let resolved = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else if raw.starts_with('/') && !raw.starts_with("//") {
        format!("{}{}", target.origin(), raw)
    } else {
        Url::parse(page_url).ok()?.join(raw).ok()?.to_string()
    };

    let without_fragment = match resolved.find('#') {
        Some(idx) => &resolved[..idx],
        None => resolved.as_str(),
    };
    if crawl_key(without_fragment).is_empty() {
        return None;
    }
    Some(without_fragment.to_string())
}
