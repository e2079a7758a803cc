//! Static call-site scanning over raw source text.
//!
//! Matching is textual. Calls built from concatenation, interpolation or a
//! variable are missed, and text inside comments can match. The graph only
//! needs a lightweight approximation of which route talks to which endpoint.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, instrument};

use crate::config::AnalyzerConfig;
use crate::model::{ApiCall, FetchedFile, HttpMethod, PathMap, RouteNode};

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;

/// `fetch(<literal>[, { ... }])`
static FETCH_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bfetch\s*\(\s*(?:'(?P<single>[^'\n]*)'|"(?P<double>[^"\n]*)"|`(?P<tick>[^`]*)`)\s*(?P<options>,\s*\{)?"#,
    )
    .expect("fetch pattern is valid")
});

/// `method: '<VERB>'` inside a fetch options object.
static METHOD_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bmethod\s*:\s*['"`](?P<verb>[A-Za-z]+)['"`]"#)
        .expect("method option pattern is valid")
});

/// `<client>.<verb>(<literal>`
static CLIENT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?P<client>[A-Za-z_][\w$]*)\s*\.\s*(?P<verb>get|post|put|patch|delete)\s*\(\s*(?:'(?P<single>[^'\n]*)'|"(?P<double>[^"\n]*)"|`(?P<tick>[^`]*)`)"#,
    )
    .expect("client call pattern is valid")
});

/// `export [async] function VERB` or `export const VERB`
static EXPORTED_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bexport\s+(?:async\s+)?(?:function\s*\*?\s*|const\s+|let\s+)(?P<verb>GET|POST|PUT|PATCH|DELETE)\b",
    )
    .expect("exported handler pattern is valid")
});

/// One outbound HTTP call found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub method: HttpMethod,
    pub target: String,

    /// Byte offset of the match, used to keep source order.
    pub offset: usize,
}

/// Extracts every literal-target call site from `content`, in source order.
///
/// Template literals containing `${` are skipped since their target is not
/// known statically.
pub fn extract_call_sites(content: &str) -> Vec<CallSite> {
    let mut sites = Vec::new();

    for captures in FETCH_CALL.captures_iter(content) {
        let Some(target) = literal_target(&captures) else {
            continue;
        };

        let method = captures
            .name("options")
            .map(|open| object_body(content, open.end()))
            .and_then(|options| METHOD_OPTION.captures(options))
            .and_then(|option| option.name("verb"))
            .map(|verb| parse_verb(verb.as_str()))
            .unwrap_or_default();

        sites.push(CallSite {
            method,
            target,
            offset: offset_of(&captures),
        });
    }

    for captures in CLIENT_CALL.captures_iter(content) {
        let Some(target) = literal_target(&captures) else {
            continue;
        };

        let method = captures
            .name("verb")
            .map(|verb| parse_verb(verb.as_str()))
            .unwrap_or_default();

        sites.push(CallSite {
            method,
            target,
            offset: offset_of(&captures),
        });
    }

    sites.sort_by_key(|site| site.offset);
    sites
}

/// Finds the HTTP verb exported by a handler entry point.
///
/// When several verbs are exported the last one in the text wins.
pub fn detect_exported_method(content: &str) -> Option<HttpMethod> {
    EXPORTED_HANDLER
        .captures_iter(content)
        .filter_map(|captures| captures.name("verb"))
        .filter_map(|verb| verb.as_str().parse::<HttpMethod>().ok())
        .last()
}

/// Appends discovered API calls to the routes that own them.
#[derive(Debug, Clone, Copy)]
pub struct CallSiteScanner<'a> {
    config: &'a AnalyzerConfig,
}

impl<'a> CallSiteScanner<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Scans every file with content and records calls into this
    /// application's API on the owning route.
    ///
    /// A file's owning route is its directory relative to the routing root.
    /// Files without a matching route, and calls whose target is outside the
    /// API prefix, are ignored. Returns the number of calls recorded.
    #[instrument(skip_all, fields(files = files.len(), routes = routes.len()))]
    pub fn scan(&self, files: &[FetchedFile], routes: &mut PathMap<RouteNode>) -> usize {
        let mut recorded = 0;

        for file in files {
            let Some(content) = file.content.as_deref().filter(|c| !c.is_empty()) else {
                continue;
            };
            let Some(route_path) = self.config.entry_point_directory(&file.path) else {
                continue;
            };
            let Some(route) = routes.get_mut(route_path) else {
                continue;
            };

            for site in extract_call_sites(content) {
                if !self.config.is_api_target(&site.target) {
                    debug!(file = %file.path, target = %site.target, "Ignoring external call");
                    continue;
                }

                route.api_calls.push(ApiCall {
                    method: site.method,
                    url: site.target,
                    source_route: route_path.to_string(),
                });
                recorded += 1;
            }
        }

        debug!(recorded, "Call-site scan complete");
        recorded
    }
}

fn literal_target(captures: &Captures<'_>) -> Option<String> {
    if let Some(m) = captures.name("single").or_else(|| captures.name("double")) {
        return Some(m.as_str().to_string());
    }

    captures
        .name("tick")
        .filter(|m| !m.as_str().contains("${"))
        .map(|m| m.as_str().to_string())
}

/// Text of the object literal whose opening brace ends at `start`, up to its
/// matching closing brace or the end of `content`.
///
/// Braces inside string and template literals are not counted.
fn object_body(content: &str, start: usize) -> &str {
    let body = &content[start..];
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, ch) in body.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '{' => depth += 1,
            '}' if depth == 0 => return &body[..index],
            '}' => depth -= 1,
            _ => {}
        }
    }

    body
}

fn offset_of(captures: &Captures<'_>) -> usize {
    captures.get(0).map(|m| m.start()).unwrap_or_default()
}

fn parse_verb(verb: &str) -> HttpMethod {
    verb.parse().unwrap_or_else(|_| {
        debug!(verb, "Unrecognized HTTP verb, treating as GET");
        HttpMethod::Get
    })
}
