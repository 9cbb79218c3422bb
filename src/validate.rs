//! Semantic checks over a resolved [`MarkataConfig`].
//!
//! Validation never fails: it returns findings, each tagged as an error (the
//! site cannot be built as configured) or a warning (it can, but probably not
//! the way the author meant). Findings are ordered errors first, then
//! warnings, each group in the order the checks ran.

use std::fmt;

use crate::config::MarkataConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFinding {
    /// Key path of the offending field, e.g. `feeds[0].items_per_page`.
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationFinding {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationFinding {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationFinding {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

/// Check `config` and return every finding, errors first.
pub fn validate(config: &MarkataConfig) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    check_url(&config.url, &mut findings);

    if config.concurrency < 0 {
        findings.push(ValidationFinding::error(
            "concurrency",
            format!("must be 0 or greater, got {}", config.concurrency),
        ));
    }

    if config.glob.patterns.is_empty() {
        findings.push(ValidationFinding::warning(
            "glob.patterns",
            "no patterns configured; no files will be processed",
        ));
    }

    for (i, feed) in config.feeds.iter().enumerate() {
        let effective = feed.effective(&config.feed_defaults);
        check_non_negative(
            &format!("feeds[{i}].items_per_page"),
            effective.items_per_page,
            &mut findings,
        );
        check_non_negative(
            &format!("feeds[{i}].orphan_threshold"),
            effective.orphan_threshold,
            &mut findings,
        );
        if !effective.formats.any_enabled() {
            findings.push(ValidationFinding::warning(
                format!("feeds[{i}].formats"),
                "no output formats enabled; the feed will not be written",
            ));
        }
    }

    check_non_negative(
        "feed_defaults.items_per_page",
        config.feed_defaults.items_per_page,
        &mut findings,
    );
    check_non_negative(
        "feed_defaults.orphan_threshold",
        config.feed_defaults.orphan_threshold,
        &mut findings,
    );

    let (mut ordered, warnings) = split_findings(findings);
    ordered.extend(warnings);
    ordered
}

pub fn has_errors(findings: &[ValidationFinding]) -> bool {
    findings.iter().any(ValidationFinding::is_error)
}

pub fn has_warnings(findings: &[ValidationFinding]) -> bool {
    findings.iter().any(|f| !f.is_error())
}

/// Split into `(errors, warnings)`, keeping the relative order of each.
pub fn split_findings(
    findings: Vec<ValidationFinding>,
) -> (Vec<ValidationFinding>, Vec<ValidationFinding>) {
    findings.into_iter().partition(ValidationFinding::is_error)
}

fn check_url(raw: &str, findings: &mut Vec<ValidationFinding>) {
    if raw.is_empty() {
        return;
    }
    let parsed = match url::Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            findings.push(ValidationFinding::error("url", format!("invalid URL: {e}")));
            return;
        }
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        findings.push(ValidationFinding::error(
            "url",
            format!("scheme must be http or https, got {}", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        findings.push(ValidationFinding::error("url", "must include a host"));
    }
}

fn check_non_negative(field: &str, value: i64, findings: &mut Vec<ValidationFinding>) {
    if value < 0 {
        findings.push(ValidationFinding::error(
            field,
            format!("must be 0 or greater, got {value}"),
        ));
    }
}
