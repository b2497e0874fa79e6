//! devguard - Device fingerprint allow-list manager
//!
//! Maintains the list of device fingerprints a filter driver consults before
//! accepting hardware. Tokens are derived from device serials and stored as a
//! multi-string value under the driver's service key.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod ui;

use cli::commands;
use cli::completions::{print_completions, CompletionShell};
use cli::exit_codes::{codes, exit_code_for};
use cli::{BackendArg, CommandContext, OutputFormat};
use devguard::config::{DevguardConfig, LOCAL_CONFIG_FILE};
use devguard::errors::{ConfigError, StoreError};
use ui::Printer;

/// devguard - Manage the device fingerprint allow-list
#[derive(Parser)]
#[command(
    name = "devguard",
    version,
    about = "Manage the device fingerprint allow-list consulted by a filter driver",
    long_about = "devguard derives stable fingerprints from device serials and keeps the\n\
                  driver's allow-list sorted, deduplicated and uppercase.\n\n\
                  Identifiers are normalized before hashing: whitespace is trimmed, anything\n\
                  after the first '&' is dropped, and the rest is uppercased.",
    arg_required_else_help = true
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Path to config file (default: .devguard.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backing store
    #[arg(long, global = true)]
    backend: Option<BackendArg>,

    /// Base directory for the file backend (implies --backend file)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tokens on the allow-list
    List {
        /// Driver service name (default from config)
        service: Option<String>,
    },

    /// Hash an identifier and add its token
    Add {
        /// Device serial or the tail of a PnP instance path
        identifier: String,

        /// Driver service name (default from config)
        service: Option<String>,
    },

    /// Remove a token from the allow-list
    Remove {
        /// 16-digit hex token
        token: String,

        /// Driver service name (default from config)
        service: Option<String>,
    },

    /// Show the normalized identifier and its token
    Hash {
        /// Device serial or the tail of a PnP instance path
        identifier: String,
    },

    /// Check whether the driver would accept a device (exit code 3 if not)
    Check {
        /// Device serial or the tail of a PnP instance path
        identifier: String,

        /// Driver service name (default from config)
        service: Option<String>,
    },

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = LOCAL_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: CompletionShell,
    },
}

fn init_logging(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbosity {
            0 => EnvFilter::new("devguard=warn"),
            1 => EnvFilter::new("devguard=info"),
            2 => EnvFilter::new("devguard=debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli, printer: Printer) -> Result<u8> {
    if let Commands::Completions { shell } = cli.command {
        print_completions(shell.into(), &mut Cli::command());
        return Ok(codes::SUCCESS);
    }

    let mut config = DevguardConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.backend.map(Into::into), cli.store_dir);
    let ctx = CommandContext::new(config, printer, cli.format);

    match cli.command {
        Commands::List { service } => commands::list::run(&ctx, service.as_deref())?,
        Commands::Add {
            identifier,
            service,
        } => commands::add::run(&ctx, &identifier, service.as_deref())?,
        Commands::Remove { token, service } => {
            commands::remove::run(&ctx, &token, service.as_deref())?
        }
        Commands::Hash { identifier } => commands::hash::run(&ctx, &identifier)?,
        Commands::Check {
            identifier,
            service,
        } => {
            if !commands::check::run(&ctx, &identifier, service.as_deref())? {
                return Ok(codes::NOT_LISTED);
            }
        }
        Commands::Init { output, force } => commands::init::run(&ctx, &output, force)?,
        Commands::Completions { .. } => {}
    }

    Ok(codes::SUCCESS)
}

/// Print a failed command's error, as a diagnostic when it has one
fn report(err: anyhow::Error, printer: &Printer) {
    let err = match err.downcast::<StoreError>() {
        Ok(store) => {
            eprintln!("{:?}", miette::Report::new(store));
            return;
        }
        Err(err) => err,
    };
    match err.downcast::<ConfigError>() {
        Ok(config) => eprintln!("{:?}", miette::Report::new(config)),
        Err(err) => printer.error(&format!("{err:#}")),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                print!("{}", e.render());
                return ExitCode::from(codes::USAGE);
            }
        },
    };

    init_logging(cli.verbose, cli.quiet);
    let printer = Printer::new().quiet(cli.quiet);

    match run(cli, printer.clone()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            let code = exit_code_for(&err);
            report(err, &printer);
            ExitCode::from(code)
        }
    }
}
