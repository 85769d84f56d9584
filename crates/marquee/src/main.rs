//! Binary entrypoint for the marquee CLI.
use std::{
    io,
    path::{Path, PathBuf},
    process,
    time::Duration,
};

use clap::{Parser, Subcommand};
use config::Config;
use logging::{self as logshared, forward};
use marquee_engine::Site;
use marquee_protocol::Effect;
use serde::Serialize;
use tokio::{
    runtime,
    sync::{mpsc, oneshot},
    time::{self, Instant},
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*};

mod error;
mod script;

use crate::{error::Error, script::Step};

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Coordinated overlays, carousels and popups", version)]
/// Command-line interface for the `marquee` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate a site configuration then exit.
    Check {
        /// Path to the configuration file (.ron or .json)
        path: PathBuf,

        /// Dump the parsed configuration as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
    /// Replay a scripted signal timeline and print every effect as a JSON line.
    Replay {
        /// Path to the configuration file (.ron or .json)
        config: PathBuf,

        /// Path to the RON script: `[(at_ms: u64, signal: Signal), ...]`
        script: PathBuf,

        /// Run against the wall clock instead of a paused virtual clock
        #[arg(long)]
        realtime: bool,

        /// Keep running this long after the last step
        #[arg(long, value_name = "MS", default_value_t = 0)]
        tail_ms: u64,

        /// Also emit engine log events as `log` effects
        #[arg(long)]
        log_effects: bool,
    },
}

/// One line of replay output.
#[derive(Serialize)]
struct Line<'a> {
    /// Virtual milliseconds since start.
    at_ms: u64,
    /// The effect.
    effect: &'a Effect,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = logshared::env_filter_from_spec(&cli.log.spec());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .with(forward::layer())
        .try_init()
        .ok();

    let result = match &cli.command {
        Command::Check { path, dump } => check(path, *dump),
        Command::Replay {
            config,
            script,
            realtime,
            tail_ms,
            log_effects,
        } => replay(
            config,
            script,
            *realtime,
            Duration::from_millis(*tail_ms),
            *log_effects,
        ),
    };
    if let Err(e) = result {
        eprintln!("{}", e.pretty());
        process::exit(1);
    }
}

fn check(path: &Path, dump: bool) -> Result<(), Error> {
    let cfg = config::load_from_path(path)?;
    // Overlay ids are only checked for uniqueness when the engine registers them.
    let (tx, _rx) = mpsc::unbounded_channel();
    Site::new(&cfg, tx)?;
    if dump {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
    } else {
        println!("OK");
    }
    Ok(())
}

fn replay(
    config_path: &Path,
    script_path: &Path,
    realtime: bool,
    tail: Duration,
    log_effects: bool,
) -> Result<(), Error> {
    let cfg = config::load_from_path(config_path)?;
    let steps = script::load(script_path)?;
    debug!(steps = steps.len(), realtime, "replay_start");

    let mut builder = runtime::Builder::new_current_thread();
    builder.enable_time();
    if !realtime {
        builder.start_paused(true);
    }
    let rt = builder.build()?;
    let result = rt.block_on(run(&cfg, steps, tail, log_effects));
    forward::clear_sink();
    result
}

async fn run(cfg: &Config, steps: Vec<Step>, tail: Duration, log_effects: bool) -> Result<(), Error> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Effect>();
    if log_effects {
        forward::set_sink(tx.clone());
    }
    let site = Site::new(cfg, tx)?;
    let start = Instant::now();

    let (done_tx, mut done_rx) = oneshot::channel::<()>();
    let printer = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(effect) = rx.recv() => print_line(start, &effect)?,
                _ = &mut done_rx => break,
            }
        }
        while let Ok(effect) = rx.try_recv() {
            print_line(start, &effect)?;
        }
        Ok::<(), Error>(())
    });

    site.start()?;
    for step in steps {
        time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        site.dispatch(step.signal)?;
    }
    time::sleep(tail).await;
    site.shutdown()?;
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "replay_done");

    done_tx.send(()).ok();
    printer.await?
}

fn print_line(start: Instant, effect: &Effect) -> Result<(), Error> {
    let line = Line {
        at_ms: start.elapsed().as_millis() as u64,
        effect,
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}
