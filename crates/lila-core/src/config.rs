//! Per-page project options.

use crate::middleware::MiddlewareToggles;
use crate::rules::{StyleOptions, TransformOptions, DEFAULT_ASSET_EXTENSIONS};
use crate::variant::Variant;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dev-server port used when none is configured.
pub const DEFAULT_PORT: u16 = 8090;

/// Options of the compiler-bound dev middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevMiddlewareOptions {
    /// Compiler output verbosity.
    pub stats: String,
    /// URL prefix the compiled bundles are served under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// Anything else, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DevMiddlewareOptions {
    fn default() -> Self {
        Self {
            stats: "errors-only".to_string(),
            public_path: None,
            extra: Map::new(),
        }
    }
}

/// Options for one page and command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectOptions {
    pub variant: Variant,
    /// Rewrite every request to GET.
    pub force_get: bool,
    /// Answer requests from mock files.
    pub mock: bool,
    pub port: u16,
    pub transform: TransformOptions,
    pub style: StyleOptions,
    /// Extensions handled by the asset rule.
    pub asset_extensions: Vec<String>,
    pub dev_middleware: DevMiddlewareOptions,
    pub hot_middleware: Map<String, Value>,
    /// Dev-server options passed through untouched.
    pub server: Map<String, Value>,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            force_get: true,
            mock: true,
            port: DEFAULT_PORT,
            transform: TransformOptions::default(),
            style: StyleOptions::default(),
            asset_extensions: DEFAULT_ASSET_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            dev_middleware: DevMiddlewareOptions::default(),
            hot_middleware: Map::new(),
            server: Map::new(),
        }
    }
}

impl ProjectOptions {
    /// Middleware toggles for a session; `serve` only matters in development.
    #[must_use]
    pub fn toggles(&self, serve: bool) -> MiddlewareToggles {
        MiddlewareToggles {
            force_get: self.force_get,
            mock: self.mock,
            serve,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ScopeMode;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = ProjectOptions::default();
        assert_eq!(options.variant, Variant::Base);
        assert!(options.force_get);
        assert!(options.mock);
        assert_eq!(options.port, 8090);
        assert_eq!(options.asset_extensions.len(), DEFAULT_ASSET_EXTENSIONS.len());
        assert_eq!(options.dev_middleware.stats, "errors-only");
    }

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        let options: ProjectOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ProjectOptions::default());
    }

    #[test]
    fn test_partial_object_keeps_other_defaults() {
        let options: ProjectOptions = serde_json::from_value(json!({
            "variant": "react-vue",
            "mock": false,
            "port": 3000,
            "style": { "modules": true, "scopeMode": "include" },
            "devMiddleware": { "headers": { "X-Dev": "1" } }
        }))
        .unwrap();

        assert_eq!(options.variant, Variant::ReactVue);
        assert!(!options.mock);
        assert!(options.force_get);
        assert_eq!(options.port, 3000);
        assert_eq!(options.style.scope_mode, ScopeMode::Include);
        assert_eq!(options.dev_middleware.stats, "errors-only");
        assert_eq!(options.dev_middleware.extra["headers"]["X-Dev"], "1");
    }

    #[test]
    fn test_toggles() {
        let options = ProjectOptions {
            force_get: false,
            ..ProjectOptions::default()
        };
        let toggles = options.toggles(true);
        assert!(!toggles.force_get);
        assert!(toggles.mock);
        assert!(toggles.serve);
    }
}
