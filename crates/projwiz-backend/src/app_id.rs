//! App identifier extraction from backend CLI output
//!
//! The CLI prints app identifiers in several formats depending on its
//! version and output mode. Extraction tries an ordered list of matchers
//! and takes the first hit, falling back to [`UNKNOWN`].

use projwiz_core::types::UNKNOWN;
use regex::Regex;
use std::sync::LazyLock;

/// One strategy for finding an app identifier in CLI output
pub trait AppIdMatcher: Send + Sync {
    /// Short name used in debug logs
    fn name(&self) -> &str;

    /// The identifier, if this strategy finds one
    fn find(&self, output: &str) -> Option<String>;
}

/// Matcher returning the first capture group of a regex
#[derive(Debug)]
pub struct PatternMatcher {
    name: &'static str,
    regex: Regex,
}

impl PatternMatcher {
    /// Build a case-insensitive matcher; `pattern` must have one capture group
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(&format!("(?i){}", pattern))?,
        })
    }
}

impl AppIdMatcher for PatternMatcher {
    fn name(&self) -> &str {
        self.name
    }

    fn find(&self, output: &str) -> Option<String> {
        self.regex
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// Matcher returning the first long whitespace-delimited token made of
/// alphanumerics, `-`, and `:`
#[derive(Debug, Clone, Copy)]
pub struct TokenScanMatcher {
    min_len: usize,
}

impl Default for TokenScanMatcher {
    fn default() -> Self {
        Self { min_len: 16 }
    }
}

impl AppIdMatcher for TokenScanMatcher {
    fn name(&self) -> &str {
        "token-scan"
    }

    fn find(&self, output: &str) -> Option<String> {
        output
            .split_whitespace()
            .find(|token| {
                token.len() >= self.min_len
                    && token
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':')
            })
            .map(str::to_string)
    }
}

const FULL_ID: &str = "[0-9]+:[0-9]+:[a-z]+:[a-zA-Z0-9]+";

static DEFAULT_PATTERNS: LazyLock<Vec<PatternMatcher>> = LazyLock::new(|| {
    [
        ("labelled-full-id", format!("App ID: ({})", FULL_ID)),
        ("labelled-id", "App ID: ([a-zA-Z0-9-]+)".to_string()),
        ("bare-full-id", format!("({})", FULL_ID)),
        ("long-token-20", "([a-zA-Z0-9-]{20,})".to_string()),
        ("created-app", "Created app ([a-zA-Z0-9-]+)".to_string()),
        ("app-created", "App created: ([a-zA-Z0-9-]+)".to_string()),
        ("unlabelled-full-id", format!("App ID ({})", FULL_ID)),
        ("unlabelled-id", "App ID ([a-zA-Z0-9-]+)".to_string()),
        ("long-token-15", "([a-zA-Z0-9-]{15,})".to_string()),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        PatternMatcher::new(name, &pattern).expect("app id pattern is valid")
    })
    .collect()
});

/// Ordered list of matchers applied to CLI output
pub struct AppIdExtractor {
    matchers: Vec<Box<dyn AppIdMatcher>>,
}

impl Default for AppIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AppIdExtractor {
    /// Extractor with the default matcher order
    pub fn new() -> Self {
        Self::with_matchers(Vec::new())
    }

    /// Extractor trying `matchers` before the defaults
    pub fn with_matchers(matchers: Vec<Box<dyn AppIdMatcher>>) -> Self {
        Self { matchers }
    }

    /// The first identifier any matcher finds, or [`UNKNOWN`]
    pub fn extract(&self, output: &str) -> String {
        let custom = self.matchers.iter().map(|m| m.as_ref());
        let defaults = DEFAULT_PATTERNS.iter().map(|m| m as &dyn AppIdMatcher);
        let token_scan = TokenScanMatcher::default();

        for matcher in custom
            .chain(defaults)
            .chain(std::iter::once(&token_scan as &dyn AppIdMatcher))
        {
            if let Some(id) = matcher.find(output) {
                tracing::debug!(matcher = matcher.name(), "extracted app id {}", id);
                return id;
            }
        }

        tracing::debug!("no app id found in backend output");
        UNKNOWN.to_string()
    }
}

/// Extract an app identifier using the default matchers
pub fn extract_app_id(output: &str) -> String {
    AppIdExtractor::new().extract(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_full_id() {
        let out = "✔ Creating Android app\n\nApp ID: 1:123456789012:android:abcdef0123456789\n";
        assert_eq!(
            extract_app_id(out),
            "1:123456789012:android:abcdef0123456789"
        );
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let out = "app id: 1:42:web:ff00ff00";
        assert_eq!(extract_app_id(out), "1:42:web:ff00ff00");
    }

    #[test]
    fn test_bare_full_id_in_noise() {
        let out = "Registered 1:9876:ios:a1b2c3 for project demo";
        assert_eq!(extract_app_id(out), "1:9876:ios:a1b2c3");
    }

    #[test]
    fn test_long_token_fallback() {
        let out = "done -> abcdefghij-klmnopqrstu";
        assert_eq!(extract_app_id(out), "abcdefghij-klmnopqrstu");
    }

    #[test]
    fn test_created_app_phrase() {
        assert_eq!(extract_app_id("Created app web-123"), "web-123");
        assert_eq!(extract_app_id("App created: ios-7"), "ios-7");
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        assert_eq!(extract_app_id(""), UNKNOWN);
        assert_eq!(extract_app_id("Error: quota exceeded"), UNKNOWN);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let out = "App ID: 1:1:android:x\nApp ID: 1:2:android:y";
        let first = extract_app_id(out);
        for _ in 0..10 {
            assert_eq!(extract_app_id(out), first);
        }
        assert_eq!(first, "1:1:android:x");
    }

    #[test]
    fn test_custom_matcher_runs_first() {
        struct Fixed;
        impl AppIdMatcher for Fixed {
            fn name(&self) -> &str {
                "fixed"
            }
            fn find(&self, output: &str) -> Option<String> {
                output.contains("magic").then(|| "custom-id".to_string())
            }
        }

        let extractor = AppIdExtractor::with_matchers(vec![Box::new(Fixed)]);
        assert_eq!(extractor.extract("magic App ID: 1:1:web:z"), "custom-id");
        assert_eq!(extractor.extract("App ID: 1:1:web:z"), "1:1:web:z");
    }

    #[test]
    fn test_token_scan_matcher() {
        let scan = TokenScanMatcher::default();
        assert_eq!(
            scan.find("id 1:22:web:abc:def:ghi").as_deref(),
            Some("1:22:web:abc:def:ghi")
        );
        assert_eq!(scan.find("short tokens only"), None);
        assert_eq!(scan.find("has/slash/in/it/long"), None);
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        for input in ["\u{0}", "::::::::::::::::::::", "App ID: ", "ü".repeat(50).as_str()] {
            let _ = extract_app_id(input);
        }
    }
}
