#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lila")]
#[command(author, version, about = "Inspect composed bundler rules and dev-server middleware", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit compact JSON output and JSON log lines
    #[arg(long, global = true)]
    json: bool,

    /// Override the project root
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the module rule set
    Rules {
        /// Page whose options are used
        #[arg(long, default_value = "index")]
        page: String,

        /// Project variant (base, react, vue, react-vue); overrides settings
        #[arg(long)]
        variant: Option<String>,

        /// Compose rules for a production build
        #[arg(long)]
        production: bool,
    },

    /// Print the development session (bundler and server configuration)
    Dev {
        /// Page to develop
        #[arg(default_value = "index")]
        page: String,

        /// Serve the page at /serve
        #[arg(long)]
        serve: bool,

        /// Dev-server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the static-serve server configuration
    Start {
        /// Page to serve
        #[arg(default_value = "index")]
        page: String,

        /// Server port
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let cwd = match cli.cwd {
        Some(path) => path,
        None => std::env::current_dir().into_diagnostic()?,
    };
    let output = commands::Output { json: cli.json };

    match cli.command {
        Commands::Rules {
            page,
            variant,
            production,
        } => commands::rules::run(&cwd, &page, variant.as_deref(), production, output),
        Commands::Dev { page, serve, port } => commands::dev::run(&cwd, &page, serve, port, output),
        Commands::Start { page, port } => commands::start::run(&cwd, &page, port, output),
    }
}
