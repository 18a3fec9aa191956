//! Command line entry point of `loadgen-target`.

use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;

use crate::config::Config;
use crate::{healthcheck, observability, web};

/// Stub HTTP service receiving generated load.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(Run),
    Healthcheck(Healthcheck),
    Version(Version),
}

/// serve the endpoints until interrupted
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "run")]
struct Run {}

/// exit successfully if a target answers `GET /up` on the configured address
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "healthcheck")]
struct Healthcheck {}

/// print the version
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "version")]
struct Version {}

/// Parses the command line and runs the selected command.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    let command = match args.command {
        Command::Version(Version {}) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        command => command,
    };

    let config = Config::load(args.config.as_deref())?;
    observability::init_tracing(&config.logging);
    tracing::debug!(?config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match command {
            Command::Run(Run {}) => web::server(config).await,
            Command::Healthcheck(Healthcheck {}) => healthcheck::healthcheck(config).await,
            Command::Version(Version {}) => Ok(()),
        }
    })
}
