//! Subcommands. Each prints a composed configuration to stdout.

pub mod dev;
pub mod rules;
pub mod start;

use lila_core::{
    Argv, BundlerConfig, DevMiddlewareOptions, InterceptorFactory, ServeOptions,
};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn print<T: Serialize>(self, value: &T) -> Result<()> {
        let text = if self.json {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        };
        println!("{}", text.into_diagnostic()?);
        Ok(())
    }
}

/// Command-line arguments forwarded to the settings provider.
pub fn argv(port: Option<u16>) -> Argv {
    let mut argv = Argv::new();
    if let Some(port) = port {
        argv.insert("port".to_string(), json!(port));
    }
    argv
}

/// Describes each interceptor instead of building a real one.
pub struct DescribedInterceptors;

impl InterceptorFactory for DescribedInterceptors {
    type Handle = Value;

    fn force_get(&self) -> Value {
        json!({ "name": "force-get" })
    }

    fn mock(&self, root: &Path) -> Value {
        json!({ "name": "mock", "root": root })
    }

    fn serve(&self, options: &ServeOptions) -> Value {
        json!({ "name": "serve", "options": options })
    }

    fn user(&self, entry: &Value) -> Value {
        json!({ "name": "user", "entry": entry })
    }

    fn dev_middleware(&self, _bundler: &BundlerConfig, options: &DevMiddlewareOptions) -> Value {
        json!({ "name": "dev-middleware", "options": options })
    }

    fn hot_middleware(&self, _bundler: &BundlerConfig, options: &Map<String, Value>) -> Value {
        json!({ "name": "hot-middleware", "options": options })
    }
}
