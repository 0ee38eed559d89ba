use super::{argv, DescribedInterceptors, Output};
use lila_core::{static_serve_session, FileSettings, StartRequest};
use miette::{IntoDiagnostic, Result};
use std::path::Path;

pub fn run(cwd: &Path, page: &str, port: Option<u16>, output: Output) -> Result<()> {
    let settings = FileSettings::load(cwd).into_diagnostic()?;
    let argv = argv(port);

    let server = static_serve_session(
        &settings,
        &DescribedInterceptors,
        &StartRequest { page, argv: &argv },
    );
    output.print(&server)
}
