//! `lila dev`: the development session with described interceptors.

use super::{argv, DescribedInterceptors, Output};
use lila_core::{
    development_session, BundlerConfigInput, DevRequest, FileSettings, MakeBundlerConfig,
};
use miette::{IntoDiagnostic, Result};
use serde_json::{json, Value};
use std::path::Path;

/// Stands in for the project's bundler config generator.
fn bundler_skeleton() -> Option<Box<dyn MakeBundlerConfig>> {
    let factory: Box<dyn MakeBundlerConfig> = Box::new(|input: &BundlerConfigInput<'_>| -> Value {
        let settings = input.settings;
        json!({
            "mode": "development",
            "entry": format!("./{}/{}/index.js", settings.src, input.page),
            "output": {
                "path": settings.cwd.join(&settings.dev),
                "publicPath": format!("/{}/", settings.dev),
            },
        })
    });
    Some(factory)
}

pub fn run(cwd: &Path, page: &str, serve: bool, port: Option<u16>, output: Output) -> Result<()> {
    let settings = FileSettings::load(cwd)
        .into_diagnostic()?
        .with_generator(bundler_skeleton);
    let argv = argv(port);

    let session = development_session(
        &settings,
        &DescribedInterceptors,
        &DevRequest {
            page,
            argv: &argv,
            serve,
        },
    )
    .into_diagnostic()?;
    output.print(&session)
}
