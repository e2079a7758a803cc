//! Analyzer configuration and the file-system conventions it encodes.
//!
//! The defaults describe a Next.js App Router project: routes live under
//! `app/`, request handlers under `app/api/`, and each route directory is
//! defined by a `page.*` or `route.*` entry-point file.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Kind of entry-point file recognized by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPointKind {
    /// Renders a route (`page.tsx`).
    Page,

    /// Implements request handling (`route.ts`).
    Handler,
}

/// Configuration for a repository analysis.
///
/// Every field has a default, so a partially specified TOML table is valid.
///
/// # Examples
///
/// ```rust
/// use repo_flow_core::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.routing_root, "app");
/// assert_eq!(config.api_prefix(), "/api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Top-level directory under which route directories live.
    pub routing_root: String,

    /// Directory name marking the API sub-tree.
    pub api_directory: String,

    /// Directory names never descended into, in addition to dot-directories.
    pub ignored_directories: Vec<String>,

    /// File stem of page entry points.
    pub page_entry_stem: String,

    /// File stem of handler entry points.
    pub handler_entry_stem: String,

    /// Extensions accepted for both entry-point kinds.
    pub entry_extensions: Vec<String>,

    /// Upper bound on remote calls for one walk. `None` means unbounded.
    pub max_requests: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            routing_root: "app".to_string(),
            api_directory: "api".to_string(),
            ignored_directories: vec!["node_modules".to_string()],
            page_entry_stem: "page".to_string(),
            handler_entry_stem: "route".to_string(),
            entry_extensions: ["tsx", "ts", "jsx", "js"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_requests: None,
        }
    }
}

impl AnalyzerConfig {
    /// URL prefix that outbound calls must start with to count as internal.
    pub fn api_prefix(&self) -> String {
        format!("/{}", self.api_directory)
    }

    /// Returns `true` for directory names the walker must not enter.
    pub fn is_ignored_directory(&self, name: &str) -> bool {
        name.starts_with('.') || self.ignored_directories.iter().any(|d| d == name)
    }

    /// Classifies a file name as an entry point, if it is one.
    pub fn entry_point_kind(&self, file_name: &str) -> Option<EntryPointKind> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        if !self.entry_extensions.iter().any(|ext| ext == extension) {
            return None;
        }

        if stem == self.page_entry_stem {
            Some(EntryPointKind::Page)
        } else if stem == self.handler_entry_stem {
            Some(EntryPointKind::Handler)
        } else {
            None
        }
    }

    /// Strips the routing root from a repository path.
    ///
    /// Returns `""` for the routing root itself and `None` for paths outside it.
    pub fn relative_to_root<'a>(&self, path: &'a str) -> Option<&'a str> {
        let path = path.trim_start_matches('/');
        let rest = path.strip_prefix(self.routing_root.as_str())?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Returns `true` when a root-relative path lies in the API sub-tree.
    pub fn is_api_path(&self, relative: &str) -> bool {
        relative.split('/').any(|segment| segment == self.api_directory)
    }

    /// Returns `true` for the API directory itself, e.g. `api` or `(internal)/api`.
    ///
    /// The marker directory opens the API sub-tree but is not an endpoint.
    pub fn is_api_marker(&self, relative: &str) -> bool {
        relative.rsplit('/').next() == Some(self.api_directory.as_str())
    }

    /// Directory of an entry-point file, relative to the routing root.
    ///
    /// `app/api/stats/route.ts` becomes `api/stats`.
    pub fn entry_point_directory<'a>(&self, file_path: &'a str) -> Option<&'a str> {
        let relative = self.relative_to_root(file_path)?;
        Some(match relative.rsplit_once('/') {
            Some((directory, _)) => directory,
            None => "",
        })
    }

    /// Endpoint key for a root-relative API path: a leading slash is added.
    pub fn endpoint_key(relative: &str) -> String {
        format!("/{}", relative)
    }

    /// Returns `true` when `target` addresses this application's own API.
    ///
    /// The prefix must be followed by the end of the string, `/` or `?`, so
    /// `/apiary` is not an API call.
    pub fn is_api_target(&self, target: &str) -> bool {
        let prefix = self.api_prefix();
        match target.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }
}
