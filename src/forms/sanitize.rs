//! Field sanitizer
//!
//! Every free-text field submitted through a form passes through here. The
//! pipeline is fixed: the SQL keyword check runs first, the script-tag check
//! second (both always run, a hit in one does not skip the other), then the
//! value is HTML-escaped unconditionally. Each hit emits one WARNING security
//! event attributed to the acting user.

use crate::audit::{AuditHandle, SecurityEventKind};

/// SQL keywords that mark a value as a suspected injection.
/// Matching is case-sensitive: only the upper-case forms trip the check.
const SQL_KEYWORDS: [&str; 5] = ["DROP", "DELETE", "UPDATE", "INSERT", "SELECT"];

/// Literal opening tag that marks a value as a suspected script injection
const SCRIPT_TAG: &str = "<script>";

/// Escape the five HTML-significant characters. `&` first, so entities are
/// not double-escaped.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Result of sanitizing a single field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedField {
    /// Escaped value (the original value if it was empty)
    pub value: String,
    pub rejected: bool,
}

/// Runs the security checks for one request, attributing events to `actor`
pub struct FieldSanitizer<'a> {
    audit: &'a AuditHandle,
    actor: &'a str,
}

impl<'a> FieldSanitizer<'a> {
    pub fn new(audit: &'a AuditHandle, actor: &'a str) -> Self {
        Self { audit, actor }
    }

    /// True if the value contains any of the upper-case SQL keywords.
    /// Emits one security event on a hit, regardless of how many keywords
    /// matched.
    pub fn check_sql_injection(&self, value: &str) -> bool {
        let hit = SQL_KEYWORDS.iter().any(|kw| value.contains(kw));
        if hit {
            self.audit
                .security(SecurityEventKind::SqlInjection, self.actor);
        }
        hit
    }

    /// True if the value contains a literal `<script>` tag
    pub fn check_xss(&self, value: &str) -> bool {
        let hit = value.contains(SCRIPT_TAG);
        if hit {
            self.audit.security(SecurityEventKind::Xss, self.actor);
        }
        hit
    }

    /// Full pipeline for one field. Empty values skip both checks and the
    /// escaping and are never rejected.
    pub fn sanitize_field(&self, value: &str) -> SanitizedField {
        if value.is_empty() {
            return SanitizedField {
                value: String::new(),
                rejected: false,
            };
        }

        let sql = self.check_sql_injection(value);
        let xss = self.check_xss(value);

        SanitizedField {
            value: escape_html(value),
            rejected: sql || xss,
        }
    }
}
