//! vinupdate CLI - Command-line interface
//!
//! Checks which head-unit firmware and map updates exist for a vehicle and
//! optionally downloads one, resuming any partial file from an earlier run.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use console::style;
use tracing::debug;
use vinupdate::download::CancelToken;
use vinupdate::query::Vin;
use vinupdate::{logging, UpdateSession};

use commands::common::{load_config_file, resolve_config, ConfigOverrides, SoftwareArg};
use error::CliError;
use output::ConsoleOutput;

#[derive(Debug, Parser)]
#[command(name = "vinupdate")]
#[command(version = vinupdate::VERSION)]
#[command(about = "Check for and download head-unit firmware and map updates", long_about = None)]
struct Cli {
    /// Vehicle identification number
    #[arg(long)]
    vin: String,

    /// Download the latest update of this category after the report
    #[arg(long, value_enum, value_name = "CATEGORY")]
    download: Option<SoftwareArg>,

    /// Output file for the download (existing content is resumed, never truncated)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Update discovery endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Application credential sent as client_id
    #[arg(long)]
    client_id: Option<String>,

    /// Timeout for the query and size probes
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the request payload and the formatted response body
    #[arg(long)]
    raw: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let code = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(_guard) => exit_code(run(cli)),
        Err(e) => exit_code(Err(e.into())),
    };
    process::exit(code);
}

fn exit_code(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if e.is_resumable() {
                eprintln!("The partial file was kept. Run the same command again to resume.");
            }
            1
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file = load_config_file(cli.config.as_deref())?;
    let config = resolve_config(
        &file,
        ConfigOverrides {
            endpoint: cli.endpoint,
            client_id: cli.client_id,
            timeout_secs: cli.timeout,
            output: cli.output,
        },
    )?;
    debug!(
        endpoint = %config.endpoint,
        output = %config.output_path.display(),
        "Resolved configuration"
    );

    let vin = Vin::parse(&cli.vin)?;
    let session = UpdateSession::from_config(config)?;
    let out = ConsoleOutput;

    let check = commands::check::run(&session, &vin, cli.raw, &out)?;

    if let Some(category) = cli.download {
        let cancel = CancelToken::new();
        let handler_token = cancel.clone();
        ctrlc::set_handler(move || {
            eprintln!();
            eprintln!("Cancelling download...");
            handler_token.cancel();
        })
        .map_err(|e| CliError::Signal(e.to_string()))?;

        commands::download::run(&session, &check, &category.into(), &cancel, &out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_vin_required() {
        let err = Cli::try_parse_from(["vinupdate"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_download_flags() {
        let cli = Cli::try_parse_from([
            "vinupdate",
            "--vin",
            "VF3CCHNZTHT014827",
            "--download",
            "nac",
            "--output",
            "nac.bin",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.vin, "VF3CCHNZTHT014827");
        assert_eq!(cli.download, Some(SoftwareArg::Nac));
        assert_eq!(cli.output, Some(PathBuf::from("nac.bin")));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.raw);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(Cli::try_parse_from(["vinupdate", "--vin", "X", "--download", "dvd"]).is_err());
    }
}
