// Browser extension URL match patterns (`https://gemini.google.com/*`).
// Pure logic over `url::Url`, same as the navigation helpers.

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};
use url::Url;

use crate::error::PatternError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemePattern {
    /// `*` - http or https.
    AnyWeb,
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    Any,
    /// `*.example.com` - the domain itself and every subdomain.
    Subdomains(String),
    Exact(String),
    /// `file://` URLs carry no host.
    Empty,
}

#[derive(Debug, Clone)]
pub struct MatchPattern {
    source: String,
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    AllUrls,
    Parts {
        scheme: SchemePattern,
        host: HostPattern,
        /// Matched against path plus `?query`.
        path: GlobMatcher,
    },
}

impl MatchPattern {
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        let trimmed = input.trim();
        if trimmed == "<all_urls>" {
            return Ok(Self {
                source: trimmed.to_string(),
                kind: PatternKind::AllUrls,
            });
        }

        let (scheme_part, rest) = trimmed
            .split_once("://")
            .ok_or_else(|| PatternError::MissingScheme(trimmed.to_string()))?;

        let scheme = match scheme_part {
            "*" => SchemePattern::AnyWeb,
            "http" | "https" | "file" => SchemePattern::Exact(scheme_part.to_string()),
            _ => return Err(PatternError::InvalidScheme(trimmed.to_string())),
        };

        let slash = rest
            .find('/')
            .ok_or_else(|| PatternError::MissingPath(trimmed.to_string()))?;
        let (host_part, path) = rest.split_at(slash);

        let host = if scheme_part == "file" {
            if !host_part.is_empty() {
                return Err(PatternError::InvalidHost(trimmed.to_string()));
            }
            HostPattern::Empty
        } else {
            parse_host(host_part).ok_or_else(|| PatternError::InvalidHost(trimmed.to_string()))?
        };

        Ok(Self {
            source: trimmed.to_string(),
            kind: PatternKind::Parts {
                scheme,
                host,
                path: path_matcher(path)
                    .ok_or_else(|| PatternError::InvalidPath(trimmed.to_string()))?,
            },
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, url: &Url) -> bool {
        let scheme = url.scheme();
        match &self.kind {
            PatternKind::AllUrls => matches!(scheme, "http" | "https" | "file"),
            PatternKind::Parts { scheme: sp, host, path } => {
                let scheme_ok = match sp {
                    SchemePattern::AnyWeb => scheme == "http" || scheme == "https",
                    SchemePattern::Exact(s) => scheme == s,
                };
                if !scheme_ok {
                    return false;
                }

                let url_host = url.host_str().unwrap_or("").to_ascii_lowercase();
                let host_ok = match host {
                    HostPattern::Any => !url_host.is_empty(),
                    HostPattern::Empty => url_host.is_empty(),
                    HostPattern::Exact(h) => url_host == *h,
                    HostPattern::Subdomains(domain) => {
                        url_host == *domain || url_host.ends_with(&format!(".{}", domain))
                    }
                };
                if !host_ok {
                    return false;
                }

                let mut target = url.path().to_string();
                if let Some(q) = url.query() {
                    target.push('?');
                    target.push_str(q);
                }
                path.is_match(&target)
            }
        }
    }

    /// Unparseable URLs never match.
    pub fn matches_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.matches(&u)).unwrap_or(false)
    }
}

impl PartialEq for MatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for MatchPattern {}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_host(host: &str) -> Option<HostPattern> {
    if host == "*" {
        return Some(HostPattern::Any);
    }
    let (pattern, name) = match host.strip_prefix("*.") {
        Some(domain) => (HostPattern::Subdomains(domain.to_ascii_lowercase()), domain),
        None => (HostPattern::Exact(host.to_ascii_lowercase()), host),
    };
    if name.is_empty() || name.contains('*') || name.contains(':') || name.contains('@') {
        return None;
    }
    Some(pattern)
}

/// Only `*` is a wildcard in match pattern paths; it also spans `/`.
/// Every other glob metacharacter is matched literally.
fn path_matcher(path: &str) -> Option<GlobMatcher> {
    let mut glob = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '?' | '[' | ']' | '{' | '}' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            _ => glob.push(c),
        }
    }

    GlobBuilder::new(&glob)
        .literal_separator(false)
        .backslash_escape(false)
        .build()
        .ok()
        .map(|g| g.compile_matcher())
}
