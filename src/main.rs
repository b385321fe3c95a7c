use std::process::ExitCode;

use bindcheck::diagnostics::{Format, print_error};
use bindcheck::{commands, logging, watch};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bindcheck", version, about = "Static validation of data-binding tags")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Accept every current diagnostic into .bindcheck.baseline
    Baseline,
    /// Validate all binding sites (exit 0 clean, 1 warnings, 2 errors, 3 failure)
    Check {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
    /// List the rule catalog with this project's severities
    Rules {
        /// Emit JSON instead of a markdown table
        #[arg(long)]
        json: bool,
    },
    /// Disable a rule in .bindcheck.toml
    Suppress {
        /// Rule code, e.g. BND0004
        rule: String,
    },
    /// Check, then re-check whenever a model file or the config changes
    Watch {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
}

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Baseline => commands::baseline().map(|()| return ExitCode::SUCCESS),
        Commands::Check { format } => commands::check(format),
        Commands::Rules { json } => commands::rules(json).map(|()| return ExitCode::SUCCESS),
        Commands::Suppress { rule } => commands::suppress(&rule).map(|()| return ExitCode::SUCCESS),
        Commands::Watch { format } => watch::run(format),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            print_error(&e);
            ExitCode::from(3)
        },
    };
}
