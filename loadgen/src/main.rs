//! Sends `POST` requests to `http://{host}:{port}/{path}` following a decaying Poisson arrival
//! process.
//!
//! The process parameters are read from the configuration (see [`loadgen::config`]); the target is
//! given on the command line as `host port path` and defaults to `localhost 80 heavywork` unless
//! all three are present. Every response is printed as `<status> <body>` to stdout in dispatch
//! order, followed by a summary of the run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use argh::FromArgs;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use loadgen::config::Config;
use loadgen::report::{self, Report};
use loadgen::{HttpTarget, RandomArrivals, generate_schedule, observability};

/// Load generator with an exponentially decaying arrival rate
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// seed for the arrival process, overrides the configuration
    #[argh(option)]
    seed: Option<u64>,

    /// only generate and summarize the schedule, without sending requests
    #[argh(switch)]
    dry_run: bool,

    /// target as `host port path`; all three are required, otherwise `localhost 80 heavywork`
    #[argh(positional, greedy)]
    target: Vec<String>,
}

/// Target used unless host, port and path are all given.
const DEFAULT_TARGET: (&str, u16, &str) = ("localhost", 80, "heavywork");

impl Args {
    /// Resolves the positional target arguments.
    ///
    /// Partial targets are ignored as a whole, as are any arguments after the third.
    fn resolve_target(&self) -> anyhow::Result<(&str, u16, &str)> {
        match self.target.as_slice() {
            [host, port, path, rest @ ..] => {
                if !rest.is_empty() {
                    tracing::warn!(ignored = ?rest, "ignoring extra target arguments");
                }
                let port = port
                    .parse::<u16>()
                    .with_context(|| format!("invalid target port `{port}`"))?;
                Ok((host.as_str(), port, path.as_str()))
            }
            [] => Ok(DEFAULT_TARGET),
            partial => {
                tracing::warn!(
                    ignored = ?partial,
                    "expected `host port path`, using the default target"
                );
                Ok(DEFAULT_TARGET)
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let mut config = Config::load(args.config.as_deref()).context("failed to load config")?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    observability::init_tracing(&config.logging)?;
    tracing::debug!(?config);

    let (host, port, path) = args.resolve_target()?;

    let params = config.process_parameters();
    let mut source = match config.seed {
        Some(seed) => RandomArrivals::from_seed(seed),
        None => RandomArrivals::from_entropy(),
    };

    tracing::info!(seed = source.seed(), ?params, "generating schedule");
    let schedule =
        generate_schedule(&params, &mut source).context("failed to generate schedule")?;

    if args.dry_run {
        report::print_schedule(&schedule, &params);
        return Ok(());
    }

    let target = HttpTarget::new(host, port, path, config.request_timeout)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let bar = ProgressBar::new(schedule.len() as u64)
        .with_style(ProgressStyle::with_template(
            "{spinner} {msg} {elapsed} {wide_bar} {pos}/{len}",
        )?)
        .with_message("Sending requests:");
    bar.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let records = loadgen::run(&schedule, &target, &cancel, |record| {
        bar.suspend(|| println!("{record}"));
        bar.inc(1);
    })
    .await;
    bar.finish_and_clear();

    Report::from_records(&records).print(start.elapsed());

    Ok(())
}

/// Stops the replay on the first Ctrl-C.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("interrupted, no further requests will be sent");
        cancel.cancel();
    }
}
