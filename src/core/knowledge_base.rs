//! Static, read-only explanations for every kind of finding the scanner can
//! report, with remediation advice. Lookups go through the closed
//! `FindingKind` enum, so every kind is guaranteed an entry.

use crate::core::models::{Finding, FindingKind};
use std::fmt;

/// High-level grouping used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingCategory {
    /// Injection found by probing a discovered surface.
    Injection,
    /// Hardening issues in the root target's response headers.
    Http,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Injection => write!(f, "Injection"),
            FindingCategory::Http => write!(f, "HTTP Security Headers"),
        }
    }
}

/// Human-readable information about a finding.
pub struct FindingDetail {
    pub title: &'static str,
    pub category: FindingCategory,
    /// What the finding means and why it matters.
    pub description: &'static str,
    /// Actionable steps to fix it.
    pub remediation: &'static str,
}

static SQL_INJECTION: FindingDetail = FindingDetail {
    title: "SQL Injection",
    category: FindingCategory::Injection,
    description: "A database error message was returned after injecting SQL syntax into a request parameter. User input likely reaches a SQL query without being parameterised, which can let an attacker read or modify the database.",
    remediation: "Use prepared statements or parameterised queries for every database access. Never build SQL by concatenating request data, and disable detailed database errors in production responses.",
};

static CROSS_SITE_SCRIPTING: FindingDetail = FindingDetail {
    title: "Reflected Cross-Site Scripting",
    category: FindingCategory::Injection,
    description: "A script payload sent in a request parameter came back unescaped in the page. An attacker can craft a link that runs arbitrary JavaScript in a victim's browser, stealing sessions or performing actions on their behalf.",
    remediation: "HTML-encode all user-controlled data when rendering it, using your template engine's auto-escaping. Add a Content-Security-Policy header as a second line of defence.",
};

static DIRECTORY_TRAVERSAL: FindingDetail = FindingDetail {
    title: "Directory Traversal",
    category: FindingCategory::Injection,
    description: "A path containing '../' sequences returned the contents of a system file. The application builds file paths from user input, allowing files outside the intended directory to be read.",
    remediation: "Map user input to an allow-list of files or identifiers instead of raw paths. Canonicalise any remaining paths and verify they stay inside the intended base directory.",
};

static COMMAND_INJECTION: FindingDetail = FindingDetail {
    title: "Command Injection",
    category: FindingCategory::Injection,
    description: "Output of a shell command appeared in the response after injecting shell metacharacters. The server passes user input to a system shell, which usually means full remote code execution.",
    remediation: "Avoid invoking a shell with request data. Use library APIs instead of external commands, or pass arguments as a fixed argument vector with strict validation.",
};

static MISSING_HEADER: FindingDetail = FindingDetail {
    title: "Missing Security Header",
    category: FindingCategory::Http,
    description: "The target does not send a recommended security response header.",
    remediation: "Configure the web server or application framework to add the header to every response.",
};

static X_FRAME_OPTIONS: FindingDetail = FindingDetail {
    title: "X-Frame-Options Missing",
    category: FindingCategory::Http,
    description: "This header protects visitors against clickjacking, where an attacker loads the site in an invisible iframe to trick users into clicking on hidden content.",
    remediation: "Add the 'X-Frame-Options' header and set it to 'DENY' or 'SAMEORIGIN'.",
};

static X_CONTENT_TYPE_OPTIONS: FindingDetail = FindingDetail {
    title: "X-Content-Type-Options Missing",
    category: FindingCategory::Http,
    description: "Without this header browsers may guess a file's content type (MIME sniffing), so a file disguised as an image could be executed as a script.",
    remediation: "Add the 'X-Content-Type-Options' header with the value 'nosniff'.",
};

static STRICT_TRANSPORT_SECURITY: FindingDetail = FindingDetail {
    title: "HSTS Header Missing",
    category: FindingCategory::Http,
    description: "Strict-Transport-Security tells browsers to only use HTTPS for the site, protecting against protocol downgrade attacks and cookie hijacking.",
    remediation: "Add 'Strict-Transport-Security: max-age=31536000; includeSubDomains' to HTTPS responses.",
};

/// Explanation for a finding kind.
pub fn detail_for_kind(kind: FindingKind) -> &'static FindingDetail {
    match kind {
        FindingKind::SqlInjection => &SQL_INJECTION,
        FindingKind::CrossSiteScripting => &CROSS_SITE_SCRIPTING,
        FindingKind::DirectoryTraversal => &DIRECTORY_TRAVERSAL,
        FindingKind::CommandInjection => &COMMAND_INJECTION,
        FindingKind::MissingSecurityHeader => &MISSING_HEADER,
    }
}

/// Explanation for a concrete finding. Missing-header findings get the entry
/// for the specific header named in their payload.
pub fn get_finding_detail(finding: &Finding) -> &'static FindingDetail {
    if finding.kind != FindingKind::MissingSecurityHeader {
        return detail_for_kind(finding.kind);
    }
    match finding.payload.to_ascii_lowercase().as_str() {
        "x-frame-options" => &X_FRAME_OPTIONS,
        "x-content-type-options" => &X_CONTENT_TYPE_OPTIONS,
        "strict-transport-security" => &STRICT_TRANSPORT_SECURITY,
        _ => &MISSING_HEADER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Severity;
    use crate::core::scanner::headers_scanner::TRACKED_HEADERS;

    #[test]
    fn every_tracked_header_has_a_specific_entry() {
        for header in TRACKED_HEADERS {
            let finding = Finding::new(
                FindingKind::MissingSecurityHeader,
                "http://example.test",
                header,
                Severity::Low,
                String::new(),
            );
            let detail = get_finding_detail(&finding);
            assert_eq!(detail.category, FindingCategory::Http);
            assert_ne!(detail.title, MISSING_HEADER.title);
        }
    }

    #[test]
    fn injection_kinds_map_to_injection_category() {
        for kind in [
            FindingKind::SqlInjection,
            FindingKind::CrossSiteScripting,
            FindingKind::DirectoryTraversal,
            FindingKind::CommandInjection,
        ] {
            assert_eq!(detail_for_kind(kind).category, FindingCategory::Injection);
        }
    }
}
