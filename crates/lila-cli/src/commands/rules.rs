use super::Output;
use lila_core::{
    module_rules, Argv, BuildMode, Command, ConfigRequest, FileSettings, SettingsProvider, Variant,
};
use miette::{IntoDiagnostic, Result};
use std::path::Path;

/// The command whose options a rule listing is made from.
fn target(production: bool) -> (Command, BuildMode) {
    if production {
        (Command::Build, BuildMode::Production)
    } else {
        (Command::Dev, BuildMode::Development)
    }
}

pub fn run(
    cwd: &Path,
    page: &str,
    variant: Option<&str>,
    production: bool,
    output: Output,
) -> Result<()> {
    let settings = FileSettings::load(cwd).into_diagnostic()?;
    let argv = Argv::new();
    let (cmd, mode) = target(production);
    let mut options = settings.make_config(&ConfigRequest {
        page,
        cmd,
        argv: &argv,
    });
    if let Some(variant) = variant {
        options.variant = variant.parse::<Variant>().into_diagnostic()?;
    }

    tracing::debug!(page, cmd = cmd.as_str(), variant = %options.variant, ?mode, "Printing module rules");
    output.print(&module_rules(&options, mode))
}
